/// Export helpers: CSV spreadsheets, browser downloads and export deadlines
use std::future::Future;

use futures::future::{select, Either};
use futures::pin_mut;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::shared::config::ExportConfig;
use crate::shared::error::ApiError;

/// Types that can be written as a spreadsheet row
pub trait CsvExportable {
    /// Column headers
    fn headers() -> Vec<&'static str>;

    /// Cell values in header order
    fn to_csv_row(&self) -> Vec<String>;
}

/// Builds the CSV text: UTF-8 BOM (so Excel detects the encoding), `;`
/// delimiter, one line per item.
pub fn build_csv<T: CsvExportable>(data: &[T]) -> Result<String, ApiError> {
    if data.is_empty() {
        return Err(ApiError::Export("No data to export".to_string()));
    }

    let mut csv_content = String::new();
    csv_content.push('\u{FEFF}');

    csv_content.push_str(&T::headers().join(";"));
    csv_content.push('\n');

    for item in data {
        let escaped_row: Vec<String> = item
            .to_csv_row()
            .iter()
            .map(|cell| escape_csv_cell(cell))
            .collect();
        csv_content.push_str(&escaped_row.join(";"));
        csv_content.push('\n');
    }

    Ok(csv_content)
}

/// Writes `data` to a CSV file and starts the download
pub fn export_to_csv<T: CsvExportable>(data: &[T], filename: &str) -> Result<(), ApiError> {
    let csv_content = build_csv(data)?;
    let blob = create_csv_blob(&csv_content)?;
    download_blob(&blob, filename)
}

/// Quotes a cell containing the delimiter, quotes or line breaks
fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(';') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        let escaped = cell.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        cell.to_string()
    }
}

fn create_csv_blob(content: &str) -> Result<Blob, ApiError> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| ApiError::Export(format!("Failed to create blob: {:?}", e)))
}

/// Hands a finished blob to the browser as a file download
pub fn download_blob(blob: &Blob, filename: &str) -> Result<(), ApiError> {
    let fail = |what: &str, e: wasm_bindgen::JsValue| ApiError::Export(format!("{}: {:?}", what, e));

    let window = web_sys::window().ok_or_else(|| ApiError::Export("No window object".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ApiError::Export("No document object".into()))?;
    let body = document
        .body()
        .ok_or_else(|| ApiError::Export("No body element".into()))?;

    let url = Url::create_object_url_with_blob(blob).map_err(|e| fail("Failed to create object URL", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| fail("Failed to create anchor", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| fail("Failed to cast to anchor", e.into()))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| fail("Failed to set style", e))?;

    body.append_child(&anchor)
        .map_err(|e| fail("Failed to append anchor", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| fail("Failed to remove anchor", e))?;

    Url::revoke_object_url(&url).map_err(|e| fail("Failed to revoke URL", e))?;

    Ok(())
}

/// Time allowed for rendering a document of `count` products, in seconds
pub fn export_timeout(count: usize, config: &ExportConfig) -> u64 {
    if count > config.large_threshold {
        config.large_timeout_secs
    } else {
        config.timeout_secs
    }
}

/// Runs `work` until `deadline` fires.
///
/// When the deadline wins the work future is dropped and the call fails
/// with [`ApiError::ExportTimeout`]; nothing produced by `work` escapes.
pub async fn race_with_deadline<T, W, D>(work: W, deadline: D, seconds: u64) -> Result<T, ApiError>
where
    W: Future<Output = Result<T, ApiError>>,
    D: Future<Output = ()>,
{
    pin_mut!(work);
    pin_mut!(deadline);
    match select(work, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            log::error!("Export timed out after {} seconds", seconds);
            Err(ApiError::ExportTimeout { seconds })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::thread;
    use std::time::{Duration, Instant};

    struct Row(&'static str, &'static str);

    impl CsvExportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["ID", "Note"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    /// Resolves after `ms` on a helper thread.
    fn deadline_after(ms: u64) -> impl Future<Output = ()> {
        let (tx, rx) = oneshot::channel::<()>();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(ms));
            let _ = tx.send(());
        });
        async move {
            let _ = rx.await;
        }
    }

    #[test]
    fn test_build_csv() {
        let csv = build_csv(&[Row("1", "ok"), Row("2", "a;b \"c\"")]).unwrap();
        assert_eq!(csv, "\u{FEFF}ID;Note\n1;ok\n2;\"a;b \"\"c\"\"\"\n");
    }

    #[test]
    fn test_build_csv_rejects_empty() {
        let rows: [Row; 0] = [];
        assert!(matches!(build_csv(&rows), Err(ApiError::Export(_))));
    }

    #[test]
    fn test_export_timeout() {
        let config = ExportConfig::default();
        assert_eq!(export_timeout(1, &config), 120);
        assert_eq!(export_timeout(100, &config), 120);
        assert_eq!(export_timeout(101, &config), 180);
    }

    #[test]
    fn test_hanging_render_times_out() {
        let started = Instant::now();
        let work = futures::future::pending::<Result<u8, ApiError>>();
        let result = block_on(race_with_deadline(work, deadline_after(50), 2));

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err, ApiError::ExportTimeout { seconds: 2 });
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_fast_render_wins() {
        let work = async { Ok::<_, ApiError>(7u8) };
        assert_eq!(block_on(race_with_deadline(work, deadline_after(5_000), 5)), Ok(7));
    }

    #[test]
    fn test_render_failure_is_not_a_timeout() {
        let work = async { Err::<u8, _>(ApiError::Export("font missing".into())) };
        let err = block_on(race_with_deadline(work, deadline_after(5_000), 5)).unwrap_err();
        assert!(!err.is_timeout());
    }
}
