/// Resolve the row cap for a listing.
///
/// A subcommand's own `--limit` beats the global one, which beats
/// `general.default_limit` from config.
#[must_use]
pub fn effective_limit(command: Option<u32>, global: Option<u32>, configured: u32) -> u32 {
    command.or(global).unwrap_or(configured)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::effective_limit;

    #[rstest]
    #[case::command_flag_wins(Some(3), Some(10), 3)]
    #[case::global_flag_next(None, Some(10), 10)]
    #[case::config_last(None, None, 50)]
    fn limit_precedence(#[case] command: Option<u32>, #[case] global: Option<u32>, #[case] expected: u32) {
        assert_eq!(effective_limit(command, global, 50), expected);
    }
}
