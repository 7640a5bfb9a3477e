//! Server-side report export.
//!
//! The dashboard never assembles files itself: it snapshots the active
//! filters and asks the backend to build the report.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::endpoints;
use crate::errors::PortalResult;
use crate::portal::Portal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportDataType {
    Complaints,
    Employees,
    Feedback,
    Ratings,
}

impl ExportDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportDataType::Complaints => "complaints",
            ExportDataType::Employees => "employees",
            ExportDataType::Feedback => "feedback",
            ExportDataType::Ratings => "ratings",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRequest {
    data_type: ExportDataType,
    format: ExportFormat,
    filters: Value,
}

/// What the backend hands back once the report is generated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub file_name: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

pub struct ExportTrigger<'a> {
    portal: &'a Portal,
}

impl<'a> ExportTrigger<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    /// Request a report for `data_type` filtered by `filters`.
    ///
    /// A toast is pushed either way; failures are also returned.
    pub async fn export<F: Serialize>(
        &self,
        data_type: ExportDataType,
        filters: &F,
        format: ExportFormat,
    ) -> PortalResult<ExportReceipt> {
        let result = self.request(data_type, filters, format).await;
        let toasts = self.portal.toasts();

        match &result {
            Ok(receipt) => {
                tracing::info!(
                    "Exported {} as {}: {}",
                    data_type.as_str(),
                    format.as_str(),
                    receipt.file_name
                );
                toasts.success(format!("Export ready: {}", receipt.file_name));
            }
            Err(e) => {
                tracing::warn!("Export of {} failed: {}", data_type.as_str(), e);
                toasts.error(format!("Export failed: {}", e.message()));
            }
        }

        result
    }

    async fn request<F: Serialize>(
        &self,
        data_type: ExportDataType,
        filters: &F,
        format: ExportFormat,
    ) -> PortalResult<ExportReceipt> {
        let ctx = self.portal.authorized_context("export report")?;
        let body = ExportRequest {
            data_type,
            format,
            filters: serde_json::to_value(filters)?,
        };
        self.portal
            .client()
            .post(endpoints::EXPORT_REPORT, &ctx, &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = ExportRequest {
            data_type: ExportDataType::Ratings,
            format: ExportFormat::Excel,
            filters: json!({"employeeId": "e1"}),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "dataType": "ratings",
                "format": "excel",
                "filters": {"employeeId": "e1"}
            })
        );
    }

    #[test]
    fn test_receipt_without_download_url() {
        let receipt: ExportReceipt =
            serde_json::from_value(json!({"fileName": "complaints.csv"})).unwrap();
        assert_eq!(receipt.file_name, "complaints.csv");
        assert!(receipt.download_url.is_none());
    }
}
