//! Document export (PDF forms and the product spreadsheet).
//!
//! Layout is done by the PDF renderer loaded next to the app
//! (`window.warehousePdf.render(kind, payload)` resolving to a `Blob`);
//! this module prepares the payload, bounds the render time and downloads
//! the result.

use contracts::domain::a001_product::Product;
use contracts::shared::ActionResult;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::api::ProductGateway;
use crate::shared::config::config;
use crate::shared::date_utils::{file_stamp, today_iso};
use crate::shared::error::ApiError;
use crate::shared::export::{download_blob, export_timeout, export_to_csv, race_with_deadline, CsvExportable};

/// Rows per rendered page
pub const ITEMS_PER_PAGE: usize = 20;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = warehousePdf, js_name = render, catch)]
    fn render_pdf(kind: &str, payload: JsValue) -> Result<js_sys::Promise, JsValue>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Ticket,
    Destruction,
    RamDiagnostic,
    RamVerify,
    RamWipe,
    Appearance,
    Check,
    Inbound,
    Outbound,
}

impl DocumentKind {
    pub fn all() -> [DocumentKind; 9] {
        [
            DocumentKind::Ticket,
            DocumentKind::Destruction,
            DocumentKind::RamDiagnostic,
            DocumentKind::RamVerify,
            DocumentKind::RamWipe,
            DocumentKind::Appearance,
            DocumentKind::Check,
            DocumentKind::Inbound,
            DocumentKind::Outbound,
        ]
    }

    /// Template name understood by the renderer
    pub fn code(&self) -> &'static str {
        match self {
            DocumentKind::Ticket => "ticket",
            DocumentKind::Destruction => "destruction",
            DocumentKind::RamDiagnostic => "ram_diagnostic",
            DocumentKind::RamVerify => "ram_verify",
            DocumentKind::RamWipe => "ram_wipe",
            DocumentKind::Appearance => "appearance",
            DocumentKind::Check => "check",
            DocumentKind::Inbound => "inbound",
            DocumentKind::Outbound => "outbound",
        }
    }

    pub fn file_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Ticket => "ticket",
            DocumentKind::Destruction => "destruction_report",
            DocumentKind::RamDiagnostic => "ram_diagnostic",
            DocumentKind::RamVerify => "ram_verify",
            DocumentKind::RamWipe => "wipe_os",
            DocumentKind::Appearance => "appearance",
            DocumentKind::Check => "checkform",
            DocumentKind::Inbound => "inbound",
            DocumentKind::Outbound => "outbound",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Ticket => "工單",
            DocumentKind::Destruction => "銷毀報告",
            DocumentKind::RamDiagnostic => "RAM 檢測報告",
            DocumentKind::RamVerify => "RAM 驗證報告",
            DocumentKind::RamWipe => "清除 OS 報告",
            DocumentKind::Appearance => "外觀檢查表",
            DocumentKind::Check => "檢查表",
            DocumentKind::Inbound => "入庫單",
            DocumentKind::Outbound => "出貨單",
        }
    }
}

/// `<prefix>_<YYYY-MM-DD>.pdf`, stamped from the first product's date.
pub fn document_filename(kind: DocumentKind, products: &[Product], today: &str) -> String {
    let date = products.first().map(|p| p.date.as_str()).unwrap_or_default();
    format!("{}_{}.pdf", kind.file_prefix(), file_stamp(date, today))
}

pub fn spreadsheet_filename(today: &str) -> String {
    format!("products_{}.csv", today)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentPage {
    pub date: String,
    /// 1-based page number inside the date group
    pub page: usize,
    pub page_count: usize,
    pub total_qty: i64,
    pub products: Vec<Product>,
}

/// What the renderer receives: products grouped by intake date, each group
/// split into pages of [`ITEMS_PER_PAGE`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentPayload {
    pub kind: DocumentKind,
    pub generated_on: String,
    pub total_qty: i64,
    pub pages: Vec<DocumentPage>,
}

impl DocumentPayload {
    pub fn build(kind: DocumentKind, products: &[Product], today: &str) -> Self {
        // groups keep the order in which their date first appears
        let mut groups: Vec<(String, Vec<Product>)> = Vec::new();
        for product in products {
            match groups.iter_mut().find(|(date, _)| *date == product.date) {
                Some((_, items)) => items.push(product.clone()),
                None => groups.push((product.date.clone(), vec![product.clone()])),
            }
        }

        let mut pages = Vec::new();
        for (date, items) in groups {
            let page_count = items.len().div_ceil(ITEMS_PER_PAGE);
            for (index, chunk) in items.chunks(ITEMS_PER_PAGE).enumerate() {
                pages.push(DocumentPage {
                    date: date.clone(),
                    page: index + 1,
                    page_count,
                    total_qty: chunk.iter().map(|p| p.qty).sum(),
                    products: chunk.to_vec(),
                });
            }
        }

        Self {
            kind,
            generated_on: today.to_string(),
            total_qty: products.iter().map(|p| p.qty).sum(),
            pages,
        }
    }
}

impl CsvExportable for Product {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID", "so_number", "Number", "Barcode", "Quantity", "Weight", "Date", "Ship Date",
            "Vendor", "Client", "Category", "Status", "Note",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        let status = match self.status() {
            Some(status) => status.label().to_string(),
            None => self.current_status.clone().unwrap_or_default(),
        };
        vec![
            self.id.clone(),
            self.so_number.clone(),
            self.number.clone(),
            self.barcode.clone(),
            self.qty.to_string(),
            self.weight.map(|w| w.to_string()).unwrap_or_default(),
            self.date.clone(),
            self.ex_date.clone().unwrap_or_default(),
            self.vender.clone(),
            self.client.clone(),
            self.category.clone(),
            status,
            self.noted.clone(),
        ]
    }
}

async fn render(kind: DocumentKind, payload: JsValue) -> Result<web_sys::Blob, ApiError> {
    let render_err = |e: JsValue| ApiError::Export(e.as_string().unwrap_or_else(|| format!("{:?}", e)));

    let promise = render_pdf(kind.code(), payload).map_err(render_err)?;
    let value = JsFuture::from(promise).await.map_err(render_err)?;
    value
        .dyn_into::<web_sys::Blob>()
        .map_err(|_| ApiError::Export("Renderer did not return a file".to_string()))
}

/// Renders `products` as a PDF and downloads it.
///
/// The render is raced against the export deadline; the file is only
/// downloaded when the renderer finishes first.
pub async fn export_document(kind: DocumentKind, products: &[Product]) -> Result<(), ApiError> {
    if products.is_empty() {
        return Err(ApiError::Export("No products to export".to_string()));
    }

    let today = today_iso();
    let payload = DocumentPayload::build(kind, products, &today);
    let js_payload =
        serde_wasm_bindgen::to_value(&payload).map_err(|e| ApiError::Export(e.to_string()))?;

    let seconds = export_timeout(products.len(), &config().export);
    let deadline = gloo_timers::future::TimeoutFuture::new((seconds * 1000) as u32);
    log::info!(
        "Rendering {} for {} products (timeout {}s)",
        kind.code(),
        products.len(),
        seconds
    );

    let blob = race_with_deadline(render(kind, js_payload), deadline, seconds).await?;
    download_blob(&blob, &document_filename(kind, products, &today))
}

/// Downloads the spreadsheet of `products`
pub fn export_spreadsheet(products: &[Product]) -> Result<(), ApiError> {
    export_to_csv(products, &spreadsheet_filename(&today_iso()))
}

/// What an export button runs: fetch everything matching the query, then
/// render.
pub async fn export_for_query<G: ProductGateway>(
    gateway: &G,
    kind: Option<DocumentKind>,
    search: &str,
    categories: &[String],
) -> ActionResult<usize> {
    let result = async {
        let products = gateway.fetch_all(search, categories).await?;
        match kind {
            Some(kind) => export_document(kind, &products).await?,
            None => export_spreadsheet(&products)?,
        }
        Ok::<_, ApiError>(products.len())
    }
    .await;

    match result {
        Ok(count) => ActionResult::ok(format!("Exported {} products", count), count),
        Err(e) if e.is_timeout() => ActionResult::failed(
            "PDF 生成超時。數據量可能太大，請嘗試減少所選產品數量或分批導出。",
        ),
        Err(e) => ActionResult::failed(e.to_string()),
    }
}
