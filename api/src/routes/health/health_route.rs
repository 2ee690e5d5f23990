/// Liveness probe.
pub async fn health_route() -> &'static str {
    "AI Code Reviewer Backend is Running!"
}
