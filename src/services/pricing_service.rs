use thiserror::Error;

use crate::models::selection::{EstimateResult, LineItem, Selection};
use crate::models::service::{PricingTables, Service};

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("Unknown service id: {0}")]
    InvalidServiceId(String),
    #[error("No pricing table entry for {0}")]
    MissingTableEntry(&'static str),
}

pub struct PricingService;

impl PricingService {
    /// Combine the selected services and the multiplier tables into a total.
    ///
    /// The order of operations is fixed: per-service adjusted price, sum,
    /// timeline multiplier, support multiplier, then the flat support fee.
    pub fn compute_estimate(
        selection: &Selection,
        catalog: &[Service],
        tables: &PricingTables,
    ) -> Result<EstimateResult, EstimateError> {
        if let Some(unknown) = selection
            .service_ids
            .iter()
            .find(|id| !catalog.iter().any(|service| &service.id == *id))
        {
            return Err(EstimateError::InvalidServiceId(unknown.clone()));
        }

        let global_complexity = tables
            .complexity(selection.complexity)
            .ok_or(EstimateError::MissingTableEntry(selection.complexity.key()))?;
        let timeline = tables
            .timeline(selection.timeline)
            .ok_or(EstimateError::MissingTableEntry(selection.timeline.key()))?;
        let support = tables
            .support(selection.support)
            .ok_or(EstimateError::MissingTableEntry(selection.support.key()))?;

        // Catalog order keeps line items and the summation order stable.
        let line_items: Vec<LineItem> = catalog
            .iter()
            .filter(|service| selection.service_ids.contains(&service.id))
            .map(|service| {
                let complexity_factor = service
                    .complexity_factor
                    .get(&selection.complexity)
                    .copied()
                    .unwrap_or(global_complexity.multiplier);
                LineItem {
                    service_id: service.id.clone(),
                    name: service.name.clone(),
                    base_price: service.base_price,
                    complexity_factor,
                    adjusted_price: service.base_price * complexity_factor,
                }
            })
            .collect();

        let subtotal: f64 = line_items.iter().map(|item| item.adjusted_price).sum();
        let total = subtotal * timeline.multiplier * support.multiplier + support.monthly_fee;

        Ok(EstimateResult {
            has_estimate: !line_items.is_empty(),
            line_items,
            subtotal,
            timeline_multiplier: timeline.multiplier,
            support_multiplier: support.multiplier,
            support_fee: support.monthly_fee,
            total,
        })
    }

    /// Display formatting with thousands separators, rounded to cents.
    pub fn format_currency(amount: f64) -> String {
        let cents = (amount * 100.0).round() as i64;
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.abs();
        let dollars = (cents / 100).to_string();

        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, digit) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        format!("{}${}.{:02}", sign, grouped, cents % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::Catalog;
    use crate::models::service::{ComplexityLevel, SupportLevel, TimelineOption};

    fn selection(ids: &[&str]) -> Selection {
        Selection {
            service_ids: ids.iter().map(|id| id.to_string()).collect(),
            complexity: ComplexityLevel::Medium,
            timeline: TimelineOption::ThreeToSixMonths,
            support: SupportLevel::Standard,
        }
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_single_service_estimate() {
        let catalog = Catalog::embedded().unwrap();
        let estimate = PricingService::compute_estimate(
            &selection(&["web-development"]),
            &catalog.services,
            &catalog.pricing,
        )
        .unwrap();

        assert!(estimate.has_estimate);
        assert_eq!(estimate.line_items.len(), 1);
        assert_eq!(estimate.subtotal, 3000.0);
        assert!(approx_eq(estimate.total, 4500.0));
    }

    #[test]
    fn test_two_service_estimate() {
        let catalog = Catalog::embedded().unwrap();
        let estimate = PricingService::compute_estimate(
            &selection(&["web-development", "cloud-migration"]),
            &catalog.services,
            &catalog.pricing,
        )
        .unwrap();

        assert_eq!(estimate.subtotal, 8000.0);
        assert!(approx_eq(estimate.total, 10000.0));
        assert_eq!(
            estimate.total,
            estimate.subtotal * estimate.timeline_multiplier * estimate.support_multiplier
                + estimate.support_fee
        );
    }

    #[test]
    fn test_unknown_service_fails_loudly() {
        let catalog = Catalog::embedded().unwrap();
        let result = PricingService::compute_estimate(
            &selection(&["web-development", "time-machine"]),
            &catalog.services,
            &catalog.pricing,
        );
        assert_eq!(
            result,
            Err(EstimateError::InvalidServiceId("time-machine".to_string()))
        );
    }

    #[test]
    fn test_empty_selection_has_no_estimate() {
        let catalog = Catalog::embedded().unwrap();
        for complexity in ComplexityLevel::ALL {
            for timeline in TimelineOption::ALL {
                for support in SupportLevel::ALL {
                    let selection = Selection {
                        service_ids: Default::default(),
                        complexity,
                        timeline,
                        support,
                    };
                    let estimate = PricingService::compute_estimate(
                        &selection,
                        &catalog.services,
                        &catalog.pricing,
                    )
                    .unwrap();
                    assert!(!estimate.has_estimate);
                    assert_eq!(estimate.subtotal, 0.0);
                    assert_eq!(estimate.total, estimate.support_fee);
                }
            }
        }
    }

    #[test]
    fn test_adding_services_never_decreases_total() {
        let catalog = Catalog::embedded().unwrap();
        for complexity in ComplexityLevel::ALL {
            let mut current = Selection {
                complexity,
                timeline: TimelineOption::OneToThreeMonths,
                support: SupportLevel::Premium,
                ..Default::default()
            };
            let mut previous_total = PricingService::compute_estimate(
                &current,
                &catalog.services,
                &catalog.pricing,
            )
            .unwrap()
            .total;

            for service in &catalog.services {
                current.service_ids.insert(service.id.clone());
                let total = PricingService::compute_estimate(
                    &current,
                    &catalog.services,
                    &catalog.pricing,
                )
                .unwrap()
                .total;
                assert!(total >= previous_total);
                previous_total = total;
            }
        }
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let catalog = Catalog::embedded().unwrap();
        let selection = Selection {
            service_ids: catalog.services.iter().map(|s| s.id.clone()).collect(),
            complexity: ComplexityLevel::Complex,
            timeline: TimelineOption::SixToTwelveMonths,
            support: SupportLevel::Basic,
        };
        let first =
            PricingService::compute_estimate(&selection, &catalog.services, &catalog.pricing)
                .unwrap();
        let second =
            PricingService::compute_estimate(&selection, &catalog.services, &catalog.pricing)
                .unwrap();
        assert_eq!(first.total.to_bits(), second.total.to_bits());
    }

    #[test]
    fn test_missing_service_level_uses_global_factor() {
        let catalog = Catalog::embedded().unwrap();
        let mut selection = selection(&["security-audit"]);
        selection.complexity = ComplexityLevel::Simple;
        let estimate =
            PricingService::compute_estimate(&selection, &catalog.services, &catalog.pricing)
                .unwrap();
        assert_eq!(estimate.line_items[0].complexity_factor, 0.8);
        assert_eq!(estimate.subtotal, 4000.0 * 0.8);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(PricingService::format_currency(4500.000000000001), "$4,500.00");
        assert_eq!(PricingService::format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(PricingService::format_currency(0.0), "$0.00");
        assert_eq!(PricingService::format_currency(999.999), "$1,000.00");
    }
}
