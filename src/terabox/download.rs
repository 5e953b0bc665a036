//! Direct link minting (`/api/download`)

use tracing::debug;

use super::types::DownloadResponse;
use super::{check_status, preview, request_error, TeraboxClient};
use crate::error::ResolveError;
use crate::resolver::ShareSession;

/// Requests a direct link for one file of the share.
///
/// `Ok(None)` when the upstream answers `errno == 0` without a `dlink`.
pub async fn get_download_link(
    tb: &TeraboxClient,
    session: &ShareSession,
    fs_id: u64,
) -> Result<Option<String>, ResolveError> {
    let url = format!("{}/api/download", tb.base_url);
    let fid_list = format!("[{}]", fs_id);

    let query = [
        ("sign", session.sign.as_str()),
        ("timestamp", session.timestamp.as_str()),
        ("fid_list", fid_list.as_str()),
        ("primaryid", session.share_id.as_str()),
        ("uk", session.uk.as_str()),
        ("product", "share"),
        ("type", "nolimit"),
    ];

    debug!("📡 download: fs_id={}", fs_id);

    let resp = tb
        .client
        .get(&url)
        .query(&query)
        .header("Referer", tb.share_page(&session.surl))
        .timeout(tb.link_timeout)
        .send()
        .await
        .map_err(request_error)?;

    let status = resp.status();
    let text = resp.text().await.map_err(request_error)?;
    debug!("📨 download response (status={}): {}", status, preview(&text));
    check_status(status)?;

    let res: DownloadResponse = serde_json::from_str(&text).map_err(|e| {
        ResolveError::Unknown(format!("failed to parse download response: {}", e))
    })?;

    if res.errno != 0 {
        return Err(ResolveError::Unknown(format!(
            "download errno={} {}",
            res.errno, res.errmsg
        )));
    }

    Ok(res.dlink())
}
