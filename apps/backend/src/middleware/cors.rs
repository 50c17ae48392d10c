use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// Parse `CORS_ALLOWED_ORIGINS` (comma separated). Blank, `null` and
/// non-http(s) entries are dropped; nothing usable means the dev origins.
pub fn allowed_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        DEV_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}

/// CORS for the admin dashboard and public site.
pub fn cors_middleware() -> Cors {
    let raw = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in allowed_origins(&raw) {
        cors = cors.allowed_origin(&origin);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_origins_are_cleaned() {
        assert_eq!(
            allowed_origins(" https://masjid.org/ , null, ftp://x, http://admin.masjid.org"),
            vec!["https://masjid.org", "http://admin.masjid.org"]
        );
    }

    #[test]
    fn empty_config_falls_back_to_localhost() {
        assert_eq!(allowed_origins(""), DEV_ORIGINS);
    }
}
