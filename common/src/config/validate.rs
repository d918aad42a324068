pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub fn validate_address(name: &str, address: &str) -> Result<(), String> {
    if address.trim().is_empty() {
        return Err(format!("{} must not be empty", name));
    }
    if !address.contains(':') {
        return Err(format!("{} must be in host:port form, got '{}'", name, address));
    }
    Ok(())
}
