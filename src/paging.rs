use tracing::debug;

use crate::schema::{PagedRequest, PagedResponse};

/// Issues `request` repeatedly, following `nextPageToken`, until a page
/// reports a blank token. Pages are returned in the order they were served.
///
/// The first request goes out with an empty token; every subsequent one
/// carries the token of the page before it.
pub fn fetch_all_pages<Req, Resp, E, F>(mut request: Req, mut execute: F) -> Result<Vec<Resp>, E>
where
    Req: PagedRequest,
    Resp: PagedResponse,
    F: FnMut(&Req) -> Result<Resp, E>,
{
    let mut pages = Vec::new();
    let mut token = String::new();
    loop {
        request.set_page_token(&token);
        let page = execute(&request)?;
        let next = page.next_page_token().to_string();
        pages.push(page);
        if next.trim().is_empty() {
            break;
        }
        token = next;
    }
    debug!(pages = pages.len(), "fetched all response pages");
    Ok(pages)
}
