//! Configuration access port trait.
//!
//! Typed getters return `Ok(None)` for an absent key and `Err(reason)` for a
//! present key whose value does not parse, so callers can tell a default
//! from a typo.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String>;
}
