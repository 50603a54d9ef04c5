//! Quote documents.
//!
//! The quote is rendered from an embedded Tera template. When `wkhtmltopdf`
//! is on the PATH the HTML is converted to PDF; otherwise, or when the
//! conversion fails, the HTML itself is written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use chrono::Duration;
use serde::Serialize;
use tera::{Context, Tera};
use tokio::process::Command;
use tracing::{error, info, warn};

use atelier_core::config::AppConfig;
use atelier_core::domain::catalog::{Service, ServicePackage};
use atelier_core::errors::ApplicationError;
use atelier_core::pricing::{format_amount, PriceBreakdown, CURRENCY};
use atelier_core::snapshot::QuoteSnapshot;

const TEMPLATE_NAME: &str = "quote.html";
const VALIDITY_DAYS: i64 = 30;
const PAYMENT_METHODS: &[&str] = &["M-Pesa", "Bank Transfer", "PayPal"];
const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("template error: {0}")]
    Template(String),
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("export task ended abnormally: {0}")]
    Task(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for ApplicationError {
    fn from(value: ExportError) -> Self {
        Self::Export(value.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportedDocument {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub bytes: u64,
}

/// Agency details printed on every quote.
#[derive(Clone, Debug, Serialize)]
pub struct AgencyDetails {
    pub name: String,
    pub whatsapp_number: String,
    pub email: String,
}

impl AgencyDetails {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name: config.agency.name.clone(),
            whatsapp_number: config.contact.whatsapp_number.clone(),
            email: config.contact.email.clone(),
        }
    }
}

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(
        &self,
        snapshot: &QuoteSnapshot,
        output_dir: &Path,
    ) -> Result<ExportedDocument, ExportError>;
}

pub fn register_template_filters(tera: &mut Tera) {
    tera.register_filter("money", tera_money_filter);
}

/// `amount | money` renders whole shillings, e.g. `KES 40,000`.
fn tera_money_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let amount = value
        .as_u64()
        .ok_or_else(|| tera::Error::msg("money filter expects a non-negative integer"))?;
    Ok(tera::Value::String(format_amount(CURRENCY, amount)))
}

/// `254700000000` -> `+254 700 000 000`.
pub fn display_phone(digits: &str) -> String {
    let digits: Vec<char> = digits.chars().filter(char::is_ascii_digit).collect();
    let groups: Vec<String> = digits.chunks(3).map(|chunk| chunk.iter().collect()).collect();
    format!("+{}", groups.join(" "))
}

#[derive(Serialize)]
struct ClientDetails<'a> {
    business_name: &'a str,
    contact_email: &'a str,
    phone_number: &'a str,
    business_type: &'a str,
    industry: &'a str,
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    agency: &'a AgencyDetails,
    agency_phone: String,
    quote_id: &'a str,
    generated_on: String,
    valid_until: String,
    validity_days: i64,
    client: ClientDetails<'a>,
    service: &'a Service,
    package: &'a ServicePackage,
    breakdown: &'a PriceBreakdown,
    total: u64,
    payment_methods: &'static [&'static str],
}

fn provided(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|value| !value.is_empty()).unwrap_or(NOT_PROVIDED)
}

#[derive(Clone, Debug)]
pub struct TeraDocumentExporter {
    tera: Tera,
    agency: AgencyDetails,
    wkhtmltopdf_path: Option<PathBuf>,
}

impl TeraDocumentExporter {
    /// Uses `wkhtmltopdf` from the PATH when `prefer_pdf` is set and it can be found.
    pub fn new(agency: AgencyDetails, prefer_pdf: bool) -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        register_template_filters(&mut tera);
        tera.add_raw_template(TEMPLATE_NAME, include_str!("../templates/quote.html.tera"))
            .map_err(|e| ExportError::Template(e.to_string()))?;

        let wkhtmltopdf_path = if prefer_pdf { which::which("wkhtmltopdf").ok() } else { None };
        match &wkhtmltopdf_path {
            Some(path) => info!(path = %path.display(), "wkhtmltopdf found"),
            None if prefer_pdf => {
                warn!("wkhtmltopdf not found in PATH - quotes will be exported as HTML")
            }
            None => {}
        }

        Ok(Self { tera, agency, wkhtmltopdf_path })
    }

    /// Converts with the given executable instead of searching the PATH.
    pub fn with_converter(mut self, path: impl Into<PathBuf>) -> Self {
        self.wkhtmltopdf_path = Some(path.into());
        self
    }

    pub fn html_only(mut self) -> Self {
        self.wkhtmltopdf_path = None;
        self
    }

    pub fn converter(&self) -> Option<&Path> {
        self.wkhtmltopdf_path.as_deref()
    }

    pub fn render_html(&self, snapshot: &QuoteSnapshot) -> Result<String, ExportError> {
        let form = &snapshot.form_data;
        let context = DocumentContext {
            agency: &self.agency,
            agency_phone: display_phone(&self.agency.whatsapp_number),
            quote_id: snapshot.quote_id.as_str(),
            generated_on: snapshot.generated_at.format("%-d %B %Y").to_string(),
            valid_until: (snapshot.generated_at + Duration::days(VALIDITY_DAYS))
                .format("%-d %B %Y")
                .to_string(),
            validity_days: VALIDITY_DAYS,
            client: ClientDetails {
                business_name: provided(form.business_name.as_deref()),
                contact_email: provided(form.contact_email.as_deref()),
                phone_number: provided(form.phone_number.as_deref()),
                business_type: provided(form.business_type.as_deref()),
                industry: provided(form.industry.as_deref()),
            },
            service: &snapshot.service,
            package: &snapshot.package,
            breakdown: &snapshot.breakdown,
            total: snapshot.total,
            payment_methods: PAYMENT_METHODS,
        };

        let context =
            Context::from_serialize(&context).map_err(|e| ExportError::Template(e.to_string()))?;
        self.tera.render(TEMPLATE_NAME, &context).map_err(|e| ExportError::Template(e.to_string()))
    }

    async fn convert_html_to_pdf(
        &self,
        html: &str,
        converter: &Path,
    ) -> Result<Vec<u8>, ExportError> {
        let temp_dir = std::env::temp_dir();
        let html_path = temp_dir.join(format!("atelier_{}.html", uuid::Uuid::new_v4()));
        let pdf_path = temp_dir.join(format!("atelier_{}.pdf", uuid::Uuid::new_v4()));

        tokio::fs::write(&html_path, html).await?;

        let output = Command::new(converter)
            .args(["--page-size", "A4", "--encoding", "utf-8", "--quiet"])
            .arg(&html_path)
            .arg(&pdf_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;
        let _ = tokio::fs::remove_file(&html_path).await;
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, "wkhtmltopdf failed");
            let _ = tokio::fs::remove_file(&pdf_path).await;
            return Err(ExportError::Conversion(stderr.trim().to_string()));
        }

        let pdf_bytes = tokio::fs::read(&pdf_path).await?;
        let _ = tokio::fs::remove_file(&pdf_path).await;
        Ok(pdf_bytes)
    }
}

#[async_trait]
impl DocumentExporter for TeraDocumentExporter {
    async fn export(
        &self,
        snapshot: &QuoteSnapshot,
        output_dir: &Path,
    ) -> Result<ExportedDocument, ExportError> {
        let html = self.render_html(snapshot)?;
        tokio::fs::create_dir_all(output_dir).await?;

        let (format, contents) = match &self.wkhtmltopdf_path {
            Some(converter) => match self.convert_html_to_pdf(&html, converter).await {
                Ok(pdf) => (ExportFormat::Pdf, pdf),
                Err(e) => {
                    warn!(error = %e, "PDF conversion failed, falling back to HTML");
                    (ExportFormat::Html, html.into_bytes())
                }
            },
            None => (ExportFormat::Html, html.into_bytes()),
        };

        let path = output_dir.join(snapshot.file_name(format.extension()));
        tokio::fs::write(&path, &contents).await?;

        info!(
            event_name = "export.document_written",
            quote_id = %snapshot.quote_id,
            format = format.extension(),
            size = contents.len(),
            "quote document written"
        );
        Ok(ExportedDocument { path, format, bytes: contents.len() as u64 })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    use atelier_core::config::AppConfig;
    use atelier_core::domain::catalog::{AddOnId, Catalog, PackageId};
    use atelier_core::domain::form::{FormField, FormUpdate};
    use atelier_core::domain::quote::QuoteState;
    use atelier_core::snapshot::QuoteSnapshot;

    use super::{
        display_phone, AgencyDetails, DocumentExporter, ExportError, ExportFormat,
        TeraDocumentExporter,
    };

    fn snapshot() -> QuoteSnapshot {
        let catalog = Catalog::standard();
        let (service, package) =
            catalog.find_package(&PackageId("web-starter".to_string())).expect("package");
        let mut state = QuoteState::default();
        state.set_selected_service(service.clone());
        state.set_selected_package(package.clone());
        for (field, value) in [
            (FormField::BusinessName, "Nyota & Sons"),
            (FormField::ContactEmail, "info@nyota.co.ke"),
            (FormField::PhoneNumber, "+254712345678"),
        ] {
            state.update_form_data(FormUpdate::parse(field, value).expect("parse"));
        }
        state.toggle_add_on(AddOnId::new("seo-optimization"));
        state.toggle_add_on(AddOnId::new("analytics-setup"));
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).single().expect("date");
        state.generate_quote_at(now, &mut StdRng::seed_from_u64(7));
        QuoteSnapshot::capture(&state, &catalog).expect("snapshot")
    }

    fn exporter() -> TeraDocumentExporter {
        TeraDocumentExporter::new(AgencyDetails::from_config(&AppConfig::default()), false)
            .expect("exporter")
    }

    #[test]
    fn rendered_quote_contains_every_section() {
        let snapshot = snapshot();
        let html = exporter().render_html(&snapshot).expect("render");

        assert!(html.contains(snapshot.quote_id.as_str()));
        assert!(html.contains("Generated: 18 October 2026"));
        assert!(html.contains("Nyota &amp; Sons"));
        assert!(html.contains("Business Type</p><p>Not provided"));
        assert!(html.contains("SEO Optimization"));
        assert!(html.contains("KES 40,000"));
        assert!(html.contains("50% upfront payment"));
        assert!(html.contains("M-Pesa"));
        assert!(html.contains("WhatsApp: +254 700 000 000"));
        assert!(html.contains("valid for 30 days"));
        assert!(html.contains("17 November 2026"));
    }

    #[test]
    fn phone_digits_are_grouped_for_display() {
        assert_eq!(display_phone("254700000000"), "+254 700 000 000");
    }

    #[tokio::test]
    async fn html_export_writes_named_file() {
        let dir = TempDir::new().expect("tempdir");
        let snapshot = snapshot();

        let document = exporter().export(&snapshot, dir.path()).await.expect("export");

        assert_eq!(document.format, ExportFormat::Html);
        assert_eq!(document.path, dir.path().join(format!("quote-{}.html", snapshot.quote_id)));
        let written = std::fs::read_to_string(&document.path).expect("read");
        assert!(written.contains("KES 40,000"));
        assert_eq!(document.bytes, written.len() as u64);
    }

    #[tokio::test]
    async fn failing_converter_falls_back_to_html() {
        let dir = TempDir::new().expect("tempdir");
        let snapshot = snapshot();
        let exporter = exporter().with_converter(dir.path().join("no-such-wkhtmltopdf"));

        let document = exporter.export(&snapshot, dir.path()).await.expect("export");

        assert_eq!(document.format, ExportFormat::Html);
        assert!(document.path.exists());
    }

    #[tokio::test]
    async fn unwritable_output_dir_is_an_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let blocker = dir.path().join("quotes");
        std::fs::write(&blocker, "not a directory").expect("write");

        let result = exporter().export(&snapshot(), &blocker).await;

        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
