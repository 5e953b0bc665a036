//! Share listing (`/api/shorturlinfo`)

use tracing::{debug, info, warn};

use super::types::ShortUrlInfoResponse;
use super::{check_status, preview, request_error, TeraboxClient};
use crate::error::ResolveError;
use crate::resolver::ShareListing;

/// Fetches the share's file tree together with the parameters needed to mint links.
///
/// An empty `pwd` is left out of the query.
pub async fn get_share_info(
    tb: &TeraboxClient,
    surl: &str,
    pwd: &str,
) -> Result<ShareListing, ResolveError> {
    let url = format!("{}/api/shorturlinfo", tb.base_url);

    let mut query = vec![("surl", surl), ("root", "1")];
    if !pwd.is_empty() {
        query.push(("pwd", pwd));
    }

    debug!("📡 shorturlinfo: surl={}", surl);

    let resp = tb
        .client
        .get(&url)
        .query(&query)
        .header("Referer", tb.share_page(surl))
        .timeout(tb.http_timeout)
        .send()
        .await
        .map_err(request_error)?;

    let status = resp.status();
    let text = resp.text().await.map_err(request_error)?;
    debug!("📨 shorturlinfo response (status={}): {}", status, preview(&text));
    check_status(status)?;

    let res: ShortUrlInfoResponse = serde_json::from_str(&text).map_err(|e| {
        ResolveError::Unknown(format!(
            "failed to parse shorturlinfo response: {} (body={})",
            e,
            preview(&text)
        ))
    })?;

    if res.errno != 0 {
        warn!("⚠️ shorturlinfo errno={}: {}", res.errno, res.message());
        return Err(classify_errno(res.errno, res.message()));
    }

    let listing = res.into_listing(surl);
    info!("✅ Share listing returned {} top-level entries", listing.entries.len());
    Ok(listing)
}

/// Maps a non-zero `errno` onto the error taxonomy.
fn classify_errno(errno: i32, message: &str) -> ResolveError {
    let lower = message.to_ascii_lowercase();
    let wants_password = ["password", "pwd", "verify"]
        .iter()
        .any(|hint| lower.contains(hint));

    let detail = if message.is_empty() {
        format!("errno={}", errno)
    } else {
        format!("{} (errno={})", message, errno)
    };

    if wants_password || matches!(errno, -9 | -12) {
        ResolveError::PasswordRequired(detail)
    } else {
        ResolveError::ShareNotFound(detail)
    }
}
