/// Reads an optional environment variable.
///
/// Absence is not an error; a set-but-empty variable is treated as
/// absent, so `FOO= cmd` behaves the same as leaving `FOO` unset.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_lookup_returns_none_when_unset() {
        assert!(get_env_var_opt("SHARED_UTILS_DOES_NOT_EXIST").is_none());
    }

    #[test]
    fn empty_value_is_treated_as_unset() {
        unsafe { std::env::set_var("SHARED_UTILS_EMPTY_TEST", "") };
        assert!(get_env_var_opt("SHARED_UTILS_EMPTY_TEST").is_none());
        unsafe { std::env::remove_var("SHARED_UTILS_EMPTY_TEST") };
    }
}
