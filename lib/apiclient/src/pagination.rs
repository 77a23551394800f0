//! Paginated reads.
//!
//! Both strategies issue `GET` requests until the caller's `next_page`
//! callback returns `None`, and collect every page's handler output in order.
//! The first failing page aborts the whole read with its error.

use std::collections::BTreeMap;

use apiclient_core::{
    AuthenticationMethod, ClientError, RequestFormatter, ResponseHandler, Transport,
};
use tracing::debug;

use crate::BaseClient;

/// Query parameters of a paginated read.
pub type PageParams = BTreeMap<String, String>;

impl<T, A, F, H> BaseClient<T, A, F, H>
where
    T: Transport,
    A: AuthenticationMethod,
    F: RequestFormatter,
    H: ResponseHandler,
{
    /// Read every page of `url`, moving through pages with query parameters.
    ///
    /// `next_page` receives the last page and the parameters used to fetch
    /// it; the parameters it returns are merged into them for the next
    /// request.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use apiclient::prelude::*;
    /// use apiclient::PageParams;
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = BaseClient::new(
    ///     HyperTransport::new(),
    ///     NoAuthentication,
    ///     JsonResponseHandler::<Vec<serde_json::Value>>::new(),
    ///     JsonRequestFormatter,
    ///     "https://api.example.com",
    /// )?;
    ///
    /// // Stop at the first empty page.
    /// let pages = client
    ///     .read_paginated_by_query_params(&client.endpoint("todos"), &[("page", "1")], |page, params| {
    ///         let current: u32 = params.get("page")?.parse().ok()?;
    ///         (!page.is_empty()).then(|| PageParams::from([("page".into(), (current + 1).to_string())]))
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_paginated_by_query_params<N>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        mut next_page: N,
    ) -> Result<Vec<H::Output>, ClientError>
    where
        N: FnMut(&H::Output, &PageParams) -> Option<PageParams>,
    {
        let mut params: PageParams = params
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        let mut pages = Vec::new();

        loop {
            let page = {
                let pairs: Vec<(&str, &str)> = params
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();
                self.read(url, &pairs).await?
            };

            let next = next_page(&page, &params);
            pages.push(page);

            match next {
                Some(next) => {
                    debug!(url, page = pages.len() + 1, "reading next page");
                    params.extend(next);
                }
                None => return Ok(pages),
            }
        }
    }

    /// Read every page starting at `url`, following the URLs `next_page`
    /// returns.
    ///
    /// `next_page` receives the last page and the URL it was read from.
    /// `params` are sent with every request.
    pub async fn read_paginated_by_url<N>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        mut next_page: N,
    ) -> Result<Vec<H::Output>, ClientError>
    where
        N: FnMut(&H::Output, &str) -> Option<String>,
    {
        let mut current = url.to_string();
        let mut pages = Vec::new();

        loop {
            let page = self.read(&current, params).await?;
            let next = next_page(&page, &current);
            pages.push(page);

            match next {
                Some(next) => {
                    debug!(url = %next, page = pages.len() + 1, "reading next page");
                    current = next;
                }
                None => return Ok(pages),
            }
        }
    }
}
