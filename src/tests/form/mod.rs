mod command_tests;
mod session_tests;
