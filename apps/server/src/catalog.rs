use cleanbook_core::{
    subscription_quote, AddOn, BillingCycle, DurationCatalog, DurationOption, SubscriptionPlan,
    VisitTerms,
};

use crate::error::ApiError;
use crate::models::{CatalogResponse, Package, ServiceInfo};

/// Visit length the published plan prices assume.
pub const PLAN_REFERENCE_HOURS: f64 = 2.0;

/// Fixed offer the quoting endpoints price against (AED).
#[derive(Debug, Clone)]
pub struct Catalog {
    pub services: Vec<ServiceInfo>,
    pub durations: DurationCatalog,
    pub add_ons: Vec<AddOn>,
    pub plans: Vec<SubscriptionPlan>,
    pub packages: Vec<Package>,
}

fn duration(minutes: u32, base_price: f64, original_price: f64, recommended: bool) -> DurationOption {
    DurationOption {
        minutes,
        base_price,
        original_price,
        recommended,
    }
}

fn add_on(id: &str, name: &str, price: f64) -> AddOn {
    AddOn {
        id: id.into(),
        name: name.into(),
        price,
    }
}

/// Plan whose published monthly price is its own monthly quote for a
/// reference visit without materials.
fn plan(id: &str, name: &str, visits: u32, rollover: u32, hourly_rate: f64) -> SubscriptionPlan {
    let mut plan = SubscriptionPlan {
        id: id.into(),
        name: name.into(),
        visits_per_month: visits,
        monthly_price: 0.0,
        max_rollover_visits: rollover,
        discount_percentage: 5.0,
    };
    let reference = VisitTerms {
        hourly_rate,
        duration_hours: PLAN_REFERENCE_HOURS,
        materials_fee: 0.0,
    };
    plan.monthly_price = subscription_quote(&plan, BillingCycle::Monthly, &reference).total_price;
    plan
}

fn package(id: &str, name: &str, visits: u32, base_price: f64) -> Package {
    Package {
        id: id.into(),
        name: name.into(),
        visits,
        base_price,
    }
}

impl Catalog {
    pub fn standard(hourly_rate: f64) -> Self {
        let services = vec![
            ServiceInfo {
                id: "home-cleaning".into(),
                name: "Home Cleaning".into(),
                description: "Regular cleaning for apartments and villas".into(),
            },
            ServiceInfo {
                id: "deep-cleaning".into(),
                name: "Deep Cleaning".into(),
                description: "Top-to-bottom clean including hard-to-reach areas".into(),
            },
            ServiceInfo {
                id: "office-cleaning".into(),
                name: "Office Cleaning".into(),
                description: "Workspace cleaning outside business hours".into(),
            },
        ];

        let durations = DurationCatalog::new(
            vec![
                duration(60, 99.0, 129.0, false),
                duration(120, 179.0, 229.0, true),
                duration(180, 249.0, 319.0, false),
                duration(240, 319.0, 399.0, false),
            ],
            duration(90, 139.0, 179.0, false),
        );

        let add_ons = vec![
            add_on("ironing", "Ironing", 35.0),
            add_on("fridge", "Inside fridge", 25.0),
            add_on("oven", "Inside oven", 30.0),
            add_on("windows", "Interior windows", 40.0),
            add_on("balcony", "Balcony", 30.0),
        ];

        let plans = vec![
            plan("weekly", "Weekly", 4, 1, hourly_rate),
            plan("twice-weekly", "Twice a week", 8, 2, hourly_rate),
            plan("thrice-weekly", "Three times a week", 12, 3, hourly_rate),
        ];

        let packages = vec![
            package("pack-2", "2 visits", 2, 139.0),
            package("pack-4", "4 visits", 4, 139.0),
            package("pack-6", "6 visits", 6, 139.0),
            package("pack-12", "12 visits", 12, 139.0),
        ];

        Self {
            services,
            durations,
            add_ons,
            plans,
            packages,
        }
    }

    pub fn plan(&self, id: &str) -> Result<&SubscriptionPlan, ApiError> {
        self.plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Plan {}", id)))
    }

    pub fn package(&self, id: &str) -> Result<&Package, ApiError> {
        self.packages
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Package {}", id)))
    }

    pub fn service(&self, id: &str) -> Result<&ServiceInfo, ApiError> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Service {}", id)))
    }

    /// Resolve add-on ids in request order; any unknown id rejects the request.
    pub fn add_ons(&self, ids: &[String]) -> Result<Vec<AddOn>, ApiError> {
        ids.iter()
            .map(|id| {
                self.add_ons
                    .iter()
                    .find(|a| &a.id == id)
                    .cloned()
                    .ok_or_else(|| ApiError::BadRequest(format!("Unknown add-on: {}", id)))
            })
            .collect()
    }

    pub fn to_response(&self) -> CatalogResponse {
        CatalogResponse {
            services: self.services.clone(),
            durations: self.durations.options().to_vec(),
            default_duration_minutes: self.durations.default_option().minutes,
            add_ons: self.add_ons.clone(),
            plans: self.plans.clone(),
            packages: self.packages.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_duration_is_ninety() {
        let catalog = Catalog::standard(35.0);
        assert_eq!(catalog.durations.default_option().minutes, 90);
        assert_eq!(catalog.durations.lookup(75).minutes, 90);
    }

    #[test]
    fn test_originals_not_below_sale_prices() {
        let catalog = Catalog::standard(35.0);
        assert!(catalog
            .durations
            .options()
            .iter()
            .all(|o| o.original_price >= o.base_price));
    }

    #[test]
    fn test_packages_match_discount_tiers() {
        let visits: Vec<u32> = Catalog::standard(35.0).packages.iter().map(|p| p.visits).collect();
        assert_eq!(visits, vec![2, 4, 6, 12]);
    }

    #[test]
    fn test_add_ons_keep_request_order() {
        let catalog = Catalog::standard(35.0);
        let ids = vec!["oven".to_string(), "ironing".to_string()];
        let found = catalog.add_ons(&ids).unwrap();
        assert_eq!(found[0].id, "oven");
        assert_eq!(found[1].id, "ironing");
    }

    #[test]
    fn test_unknown_add_on_rejected() {
        let catalog = Catalog::standard(35.0);
        let err = catalog.add_ons(&["jacuzzi".to_string()]).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_lookups_not_found() {
        let catalog = Catalog::standard(35.0);
        assert!(catalog.plan("weekly").is_ok());
        assert!(matches!(catalog.plan("daily"), Err(ApiError::NotFound(_))));
        assert!(catalog.package("pack-3").is_err());
        assert!(catalog.service("home-cleaning").is_ok());
    }

    #[test]
    fn test_plan_prices_match_reference_quote() {
        let catalog = Catalog::standard(35.0);
        let weekly = catalog.plan("weekly").unwrap();
        // 2h at 35/h = 70, less 5% for a long visit, four visits
        assert!((weekly.monthly_price - 266.0).abs() < 1e-9);

        let terms = VisitTerms {
            hourly_rate: 35.0,
            duration_hours: PLAN_REFERENCE_HOURS,
            materials_fee: 0.0,
        };
        for plan in &catalog.plans {
            let quote = subscription_quote(plan, BillingCycle::Monthly, &terms);
            assert_eq!(quote.total_price, plan.monthly_price);
        }
    }

    #[test]
    fn test_plan_prices_follow_hourly_rate() {
        let cheap = Catalog::standard(30.0);
        let dear = Catalog::standard(40.0);
        let price = |c: &Catalog| c.plan("weekly").unwrap().monthly_price;
        assert!(price(&cheap) < price(&dear));
    }

    #[test]
    fn test_response_lists_default_once() {
        let response = Catalog::standard(35.0).to_response();
        let ninety = response.durations.iter().filter(|d| d.minutes == 90).count();
        assert_eq!(ninety, 1);
        assert_eq!(response.default_duration_minutes, 90);
    }
}
