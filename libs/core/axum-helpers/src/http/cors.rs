use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Parses a comma-separated origin list, ignoring blank entries.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    Ok(origins)
}

/// CORS for the browser client: listed origins, credentials allowed, 1 hour preflight cache.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Reads `CORS_ALLOWED_ORIGIN` (required, comma-separated).
///
/// - Development: `CORS_ALLOWED_ORIGIN=http://localhost:5173`
/// - Production: `CORS_ALLOWED_ORIGIN=https://lostfound.campus.edu`
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let raw = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:5173",
        )
    })?;

    let origins = parse_allowed_origins(&raw)?;
    tracing::info!("CORS configured with allowed origins: {}", raw);

    Ok(create_cors_layer(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins(" http://localhost:5173 , ,https://lf.campus.edu").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://lf.campus.edu");
    }

    #[test]
    fn test_parse_allowed_origins_rejects_empty() {
        assert!(parse_allowed_origins(" , ").is_err());
    }

    #[test]
    fn test_cors_layer_from_env_requires_variable() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            let err = cors_layer_from_env().unwrap_err();
            assert!(err.to_string().contains("CORS_ALLOWED_ORIGIN"));
        });
        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("http://localhost:5173"), || {
            assert!(cors_layer_from_env().is_ok());
        });
    }
}
