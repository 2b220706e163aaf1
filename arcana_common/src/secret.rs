use std::{
    fmt,
    fmt::{Debug, Display},
};

/// Holds a value that must never reach the logs: the AbacatePay API key, the webhook shared
/// secret. Config structs derive `Debug` and get logged at startup, so both `Debug` and `Display`
/// print `****`; reading the value takes an explicit [`Secret::reveal`] at the point of use.
#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

#[cfg(test)]
mod test {
    use super::Secret;

    #[test]
    fn secrets_do_not_leak_through_formatting() {
        let api_key = Secret::new("abc_dev_Hr2qpqnMDoQSzrm9".to_string());
        assert_eq!(format!("{api_key}"), "****");
        assert_eq!(format!("{api_key:?}"), "****");
        assert_eq!(api_key.reveal(), "abc_dev_Hr2qpqnMDoQSzrm9");
    }
}
