use crate::domain::model::CouponCode;
use crate::domain::ports::CouponSource;
use crate::utils::error::{CouponerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

pub const DEFAULT_LISTING_URL: &str = "https://bdm.tools/coupons";

const TABLE_SELECTOR: &str = "table.table-dark";
const ROW_SELECTOR: &str = "tbody > tr";
const CELL_SELECTOR: &str = "td";
const MARKER_SELECTOR: &str = "b";

/// 從優惠券列表網頁擷取可用代碼
pub struct ListingSource {
    url: String,
    client: Client,
}

impl ListingSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_fetch(&self) -> Result<Vec<CouponCode>> {
        tracing::debug!("Fetching coupon listing from: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        tracing::debug!("Listing response status: {}", response.status());
        let body = response.error_for_status()?.text().await?;

        parse_coupon_table(&body)
    }
}

#[async_trait]
impl CouponSource for ListingSource {
    async fn fetch_available_codes(&self) -> Vec<CouponCode> {
        match self.try_fetch().await {
            Ok(codes) => {
                tracing::info!("📋 Found {} active coupon(s) on listing", codes.len());
                codes
            }
            Err(e) => {
                tracing::error!("❌ Failed to scrape coupons: {}", e);
                tracing::debug!("💡 {}", e.recovery_suggestion());
                Vec::new()
            }
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| CouponerError::listing(format!("invalid selector '{}': {}", css, e)))
}

/// 解析優惠券表格
///
/// 每一列第一個儲存格必須剛好有一個 `<b>` 標記才算有效代碼：
/// 廣告列沒有標記，過期或重複的代碼則有多個。
pub fn parse_coupon_table(html: &str) -> Result<Vec<CouponCode>> {
    let table_sel = selector(TABLE_SELECTOR)?;
    let row_sel = selector(ROW_SELECTOR)?;
    let cell_sel = selector(CELL_SELECTOR)?;
    let marker_sel = selector(MARKER_SELECTOR)?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| CouponerError::listing("coupon table not found on the page"))?;

    let codes = table
        .select(&row_sel)
        .filter_map(|row| row.select(&cell_sel).next())
        .filter_map(|cell| single_marker_text(cell, &marker_sel))
        .map(CouponCode::new)
        .collect();

    Ok(codes)
}

fn single_marker_text(cell: ElementRef<'_>, marker_sel: &Selector) -> Option<String> {
    let mut markers = cell.select(marker_sel);
    let marker = markers.next()?;
    if markers.next().is_some() {
        return None;
    }

    let text = marker.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}
