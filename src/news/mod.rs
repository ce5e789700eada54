mod error;
mod fetch;
pub(crate) mod model;
mod parse;

use crate::config::RuntimeConfig;
use crate::open_url::Browser;
use crate::ui::{self, Command, Tokens};
use crate::util::links::combine_urls;
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub use error::NewsError;
pub use fetch::{HttpSource, PageSource};
pub use model::EntryList;
pub use parse::{ParsePolicy, parse_entries};

/// Runs the interactive listing session starting at `start`.
///
/// Each page is fetched, rendered, then tokens are read until one navigates
/// away. Returns `Ok` when the input runs out; any fetch or parse failure
/// ends the session with an error.
pub async fn run<S, B, R, W>(
    cfg: &RuntimeConfig,
    source: &S,
    browser: &B,
    start: &str,
    input: R,
    out: &mut W,
) -> Result<(), NewsError>
where
    S: PageSource,
    B: Browser,
    R: BufRead,
    W: Write,
{
    let policy = ParsePolicy {
        require_entries: cfg.strict,
        ..ParsePolicy::default()
    };
    let mut tokens = Tokens::new(input);
    let mut endpoint = start.to_string();
    let mut previous = String::new();

    'pages: loop {
        let page = view_page(cfg, source, &policy, &endpoint, out).await?;

        while let Some(token) = tokens.next_token()? {
            match Command::parse(&token) {
                Command::Next => {
                    previous = std::mem::replace(&mut endpoint, page.next_page_ref.clone());
                    continue 'pages;
                }
                Command::Previous => {
                    let back = std::mem::take(&mut previous);
                    previous = std::mem::replace(&mut endpoint, back);
                    continue 'pages;
                }
                Command::Open(id) => {
                    if let Some(entry) = page.find(id) {
                        browser.open(&combine_urls([cfg.base_url.as_str(), entry.link.as_str()]));
                    } else {
                        debug!(id, "no entry with that id");
                    }
                }
                Command::Ignore => debug!(%token, "ignoring input"),
            }
        }
        info!("input closed, ending session");
        return Ok(());
    }
}

/// Fetches, parses and renders the listing at `endpoint`.
pub async fn view_page<S: PageSource, W: Write>(
    cfg: &RuntimeConfig,
    source: &S,
    policy: &ParsePolicy,
    endpoint: &str,
    out: &mut W,
) -> Result<EntryList, NewsError> {
    let url = combine_urls([cfg.base_url.as_str(), endpoint]);
    writeln!(out, "Fetching {}", url)?;

    let body = source.fetch(&url).await?;
    let list = parse_entries(&body, policy).map_err(|source| NewsError::Parse {
        url: url.clone(),
        source,
    })?;
    debug!(%url, entries = list.entries.len(), next = %list.next_page_ref, "page ready");

    ui::render_entries(out, &list)?;
    Ok(list)
}
