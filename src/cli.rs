/// Validate argv and return the configuration file path.
///
/// `argv` includes the program name at index 0, matching
/// `std::env::args()`. Returns `None` for anything other than exactly one
/// positional argument; the caller prints the usage line in that case
/// (spec.md §6, `examples/original_source/src/runPipe.cpp`'s `checkArgs`).
pub fn parse_args(argv: &[String]) -> Option<&str> {
    if argv.len() != 2 {
        return None;
    }
    Some(argv[1].as_str())
}

/// The exact usage line spec.md §6 fixes, using `argv[0]` verbatim.
pub fn usage(argv0: &str) -> String {
    format!("Usage: {argv0} <yml-file>")
}
