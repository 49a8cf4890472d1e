/// Read-through caching for async catalog calls.
///
/// Returns the cached value for `$key` when present; otherwise awaits `$block`,
/// queues the result for a background write with `$ttl` seconds and returns it.
/// Must be used inside a function returning `AppResult`.
///
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Director(movie_id), DIRECTOR_CACHE_TTL, async move {
///     self.request_credits(movie_id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
