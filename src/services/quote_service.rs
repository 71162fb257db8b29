use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::models::quote::{EstimateId, QuoteDocument, QuoteField, QuoteLine, QuoteTotals};
use crate::models::selection::{EstimateResult, Selection};
use crate::models::service::{PricingTables, Service};
use crate::services::pricing_service::PricingService;

const VALIDITY_DAYS: i64 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("Select at least one service to generate an estimate")]
    EmptyEstimate,
}

pub struct QuoteService;

impl QuoteService {
    pub fn render_quote_document(
        selection: &Selection,
        estimate: &EstimateResult,
        estimate_id: &EstimateId,
        as_of: NaiveDate,
        catalog: &[Service],
        tables: &PricingTables,
        contact_email: &str,
    ) -> Result<QuoteDocument, QuoteError> {
        if !estimate.has_estimate {
            return Err(QuoteError::EmptyEstimate);
        }

        let lines = estimate
            .line_items
            .iter()
            .map(|item| {
                let service = catalog.iter().find(|service| service.id == item.service_id);
                QuoteLine {
                    name: item.name.clone(),
                    description: service.map(|s| s.description.clone()).unwrap_or_default(),
                    features: service.map(|s| s.features.clone()).unwrap_or_default(),
                    base_price: item.base_price,
                    complexity_factor: item.complexity_factor,
                    amount: item.adjusted_price,
                }
            })
            .collect();

        let complexity = tables
            .complexity(selection.complexity)
            .map(|option| option.label.clone())
            .unwrap_or_else(|| selection.complexity.key().to_string());
        let timeline = tables
            .timeline(selection.timeline)
            .map(|choice| choice.label.clone())
            .unwrap_or_else(|| selection.timeline.key().to_string());
        let support = tables
            .support(selection.support)
            .map(|option| option.label.clone())
            .unwrap_or_else(|| selection.support.key().to_string());

        let configuration = vec![
            QuoteField {
                label: "Complexity".to_string(),
                value: complexity,
            },
            QuoteField {
                label: "Timeline".to_string(),
                value: format!("{} (x{:.2})", timeline, estimate.timeline_multiplier),
            },
            QuoteField {
                label: "Support".to_string(),
                value: format!(
                    "{} (x{:.2}, {}/month)",
                    support,
                    estimate.support_multiplier,
                    PricingService::format_currency(estimate.support_fee)
                ),
            },
        ];

        let notes = vec![
            format!(
                "Includes the first month of {} support.",
                support_name(selection, tables)
            ),
            format!("This estimate is valid for {} days from the issue date.", VALIDITY_DAYS),
            "Final pricing is confirmed after a free discovery call.".to_string(),
        ];

        Ok(QuoteDocument {
            estimate_id: estimate_id.clone(),
            reference: estimate_id.reference(),
            file_name: estimate_id.file_name(),
            issued_on: as_of,
            valid_until: as_of + Duration::days(VALIDITY_DAYS),
            lines,
            configuration,
            totals: QuoteTotals {
                subtotal: estimate.subtotal,
                timeline_multiplier: estimate.timeline_multiplier,
                support_multiplier: estimate.support_multiplier,
                support_fee: estimate.support_fee,
                total: estimate.total,
                formatted_total: PricingService::format_currency(estimate.total),
            },
            notes,
            contact_email: contact_email.to_string(),
        })
    }
}

fn support_name(selection: &Selection, tables: &PricingTables) -> String {
    tables
        .support(selection.support)
        .map(|option| option.label.to_lowercase())
        .unwrap_or_else(|| selection.support.key().to_string())
}
