use crate::error::AppError;

/// Credentials for the first super admin, created at startup when absent.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl BootstrapAdmin {
    /// Reads `BOOTSTRAP_ADMIN_EMAIL`, `BOOTSTRAP_ADMIN_PASSWORD` and the optional
    /// `BOOTSTRAP_ADMIN_NAME`. Both required variables unset means "no bootstrap";
    /// exactly one of them set is a configuration error.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Option<Self>, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = lookup("BOOTSTRAP_ADMIN_EMAIL").filter(|v| !v.trim().is_empty());
        let password = lookup("BOOTSTRAP_ADMIN_PASSWORD").filter(|v| !v.is_empty());

        match (email, password) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => Ok(Some(Self {
                email: email.trim().to_lowercase(),
                name: lookup("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                password,
            })),
            _ => Err(AppError::config(
                "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together",
            )),
        }
    }
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_means_no_bootstrap() {
        assert!(BootstrapAdmin::from_lookup(|_| None).unwrap().is_none());
    }

    #[test]
    fn half_configured_is_an_error() {
        let result = BootstrapAdmin::from_lookup(|name| {
            (name == "BOOTSTRAP_ADMIN_EMAIL").then(|| "admin@masjid.test".to_string())
        });
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[test]
    fn email_is_normalised() {
        let admin = BootstrapAdmin::from_lookup(|name| match name {
            "BOOTSTRAP_ADMIN_EMAIL" => Some(" Admin@Masjid.Test ".to_string()),
            "BOOTSTRAP_ADMIN_PASSWORD" => Some("change-me-now".to_string()),
            _ => None,
        })
        .unwrap()
        .unwrap();
        assert_eq!(admin.email, "admin@masjid.test");
        assert_eq!(admin.name, "Administrator");
    }
}
