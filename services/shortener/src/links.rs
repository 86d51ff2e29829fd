//! Link creation and resolution

use std::future::Future;

use tracing::{info, warn};

use crate::{
    codegen,
    error::{AppError, AppResult},
    models::{Link, ShortenedLink},
    repositories::LinkRepository,
};

/// Consecutive insert collisions tolerated before giving up
pub const MAX_INSERT_ATTEMPTS: u32 = 16;

/// Join an origin and a code into a public short URL
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

/// Store `original_url` under a fresh unique code
///
/// The URL is stored verbatim without any validation. Another request may
/// claim the same code between the existence check and the insert; the
/// store rejects the second insert and a new code is drawn.
pub async fn shorten(
    links: &LinkRepository,
    original_url: &str,
    owner: Option<i64>,
    base_url: &str,
) -> AppResult<ShortenedLink> {
    let link = insert_with_retry(links, original_url, owner, move || {
        codegen::generate_unique_code(links)
    })
    .await?;
    let short_url = short_url(base_url, &link.short_code);

    info!(
        "Created short link {} (owner: {:?})",
        link.short_code, link.user_id
    );

    Ok(ShortenedLink { link, short_url })
}

/// Insert under codes from `next_code` until one is accepted by the store
async fn insert_with_retry<F, Fut>(
    links: &LinkRepository,
    original_url: &str,
    owner: Option<i64>,
    mut next_code: F,
) -> AppResult<Link>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<String>>,
{
    for attempt in 1..=MAX_INSERT_ATTEMPTS {
        let code = next_code().await?;

        match links.insert(owner, original_url, &code).await {
            Ok(link) => return Ok(link),
            Err(AppError::DuplicateShortCode(code)) => {
                warn!(
                    "Short code {} was claimed concurrently (attempt {}/{})",
                    code, attempt, MAX_INSERT_ATTEMPTS
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::Internal(
        "Failed to generate a unique short code".to_string(),
    ))
}

/// Exact-match lookup of the URL stored under `code`
pub async fn resolve(links: &LinkRepository, code: &str) -> AppResult<String> {
    links
        .find_by_code(code)
        .await?
        .map(|link| link.original_url)
        .ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codegen::CODE_LENGTH, test_utils::test_pool};
    use std::collections::HashSet;

    #[test]
    fn test_short_url() {
        assert_eq!(short_url("http://localhost:5000", "abc123"), "http://localhost:5000/abc123");
        assert_eq!(short_url("https://sho.rt/", "abc123"), "https://sho.rt/abc123");
    }

    #[tokio::test]
    async fn test_shorten_then_resolve_is_verbatim() {
        let links = LinkRepository::new(test_pool().await);

        for original in [
            "https://example.com",
            "https://example.com/Path?Q=1&r=%20#frag",
            "HTTPS://EXAMPLE.COM/",
            "not a url at all",
            "javascript:alert(1)",
            "",
        ] {
            let shortened = shorten(&links, original, None, "http://localhost").await.unwrap();
            assert_eq!(shortened.link.short_code.len(), CODE_LENGTH);
            assert_eq!(
                shortened.short_url,
                format!("http://localhost/{}", shortened.link.short_code)
            );

            let resolved = resolve(&links, &shortened.link.short_code).await.unwrap();
            assert_eq!(resolved, original);
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let links = LinkRepository::new(test_pool().await);
        shorten(&links, "https://example.com", None, "http://localhost")
            .await
            .unwrap();

        assert!(matches!(
            resolve(&links, "nope00").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_resolve_is_exact_match() {
        let links = LinkRepository::new(test_pool().await);
        links.insert(None, "https://example.com", "AbC123").await.unwrap();

        assert!(resolve(&links, "AbC123").await.is_ok());
        assert!(resolve(&links, "abc123").await.is_err());
        assert!(resolve(&links, "AbC12").await.is_err());
        assert!(resolve(&links, "AbC123 ").await.is_err());
    }

    #[tokio::test]
    async fn test_insert_collision_draws_new_code() {
        let links = LinkRepository::new(test_pool().await);
        // Claimed by another request after the existence check passed
        links.insert(None, "https://first.example", "racey1").await.unwrap();

        let mut calls = 0;
        let link = insert_with_retry(&links, "https://second.example", None, || {
            calls += 1;
            let code = if calls == 1 { "racey1" } else { "fresh1" };
            async move { Ok(code.to_string()) }
        })
        .await
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(link.short_code, "fresh1");
        assert_eq!(link.original_url, "https://second.example");
        assert_eq!(
            resolve(&links, "racey1").await.unwrap(),
            "https://first.example"
        );
    }

    #[tokio::test]
    async fn test_insert_gives_up_after_max_attempts() {
        let links = LinkRepository::new(test_pool().await);
        links.insert(None, "https://first.example", "racey1").await.unwrap();

        let mut calls = 0;
        let result = insert_with_retry(&links, "https://second.example", None, || {
            calls += 1;
            async { Ok("racey1".to_string()) }
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(calls, MAX_INSERT_ATTEMPTS);
        assert_eq!(
            resolve(&links, "racey1").await.unwrap(),
            "https://first.example"
        );
    }

    #[tokio::test]
    async fn test_code_source_errors_are_not_retried() {
        let links = LinkRepository::new(test_pool().await);

        let mut calls = 0;
        let result = insert_with_retry(&links, "https://example.com", None, || {
            calls += 1;
            async { Err(AppError::Internal("store unavailable".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_concurrent_shorten_yields_distinct_codes() {
        let links = LinkRepository::new(test_pool().await);

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let links = links.clone();
                tokio::spawn(async move {
                    let original = format!("https://example.com/{}", i);
                    shorten(&links, &original, None, "http://localhost").await
                })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            let shortened = handle.await.unwrap().unwrap();
            codes.insert(shortened.link.short_code);
        }

        assert_eq!(codes.len(), 100);
    }
}
