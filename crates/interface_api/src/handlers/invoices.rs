//! Invoice handlers
//!
//! Generation and download answer with the PDF itself as an attachment.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};

use domain_billing::{GeneratedInvoice, InvoiceNumber, InvoiceRequest};

use crate::auth::Claims;
use crate::dto::invoices::InvoiceSummary;
use crate::{error::ApiError, AppState};

fn pdf_response(generated: GeneratedInvoice) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", generated.file_name());
    (
        [
            (header::CONTENT_TYPE, generated.document.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        generated.document.bytes,
    )
        .into_response()
}

pub async fn generate_invoice(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<InvoiceRequest>,
) -> Result<Response, ApiError> {
    let generated = state.invoices.generate(claims.user_id(), request).await?;
    Ok(pdf_response(generated))
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<InvoiceSummary>>, ApiError> {
    let invoices = state.invoices.list(claims.user_id()).await?;
    Ok(Json(invoices.into_iter().map(InvoiceSummary::from).collect()))
}

pub async fn download_invoice(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(number): Path<String>,
) -> Result<Response, ApiError> {
    let number = InvoiceNumber::parse(&number)?;
    let invoice = state.invoices.get(&number).await?;
    if !claims.can_access(invoice.user_id) {
        return Err(ApiError::NotFound(format!("Invoice not found: {}", number)));
    }
    let generated = state.invoices.download(&number).await?;
    Ok(pdf_response(generated))
}
