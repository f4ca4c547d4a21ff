//! Scenario tests exercising the public surface


mod boundary_tests;
mod preset_tests;
