//! Built-in service offering templates.
//!
//! Titles, descriptions and form-field schemas live here; prices are
//! authoritative on the server and merged in at fetch time. A template
//! whose id has no server row keeps its built-in default price, and an
//! unparsable server override is ignored rather than replacing a known-good
//! amount.

use regpoint_core::Naira;

use crate::registry::ServicePricing;

/// Closed set of form-field kinds the order form can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Select,
    Textarea,
    Email,
    Tel,
}

impl FieldKind {
    /// HTML `input type` for kinds rendered as `<input>`.
    #[must_use]
    pub const fn input_type(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Email => "email",
            Self::Tel => "tel",
            _ => "text",
        }
    }
}

/// One field in a service's order form.
#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Choices for `Select` fields; empty otherwise.
    pub options: &'static [&'static str],
}

impl FormField {
    /// Whether the field renders as a `<select>`.
    #[must_use]
    pub fn is_select(&self) -> bool {
        self.kind == FieldKind::Select
    }

    /// Whether the field renders as a `<textarea>`.
    #[must_use]
    pub fn is_textarea(&self) -> bool {
        self.kind == FieldKind::Textarea
    }
}

/// A service offering template.
#[derive(Debug, Clone, Copy)]
pub struct ServiceTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
    pub default_price: Naira,
    pub fields: &'static [FormField],
}

/// A template merged with server pricing, ready for rendering.
#[derive(Debug, Clone)]
pub struct ServiceView {
    pub id: String,
    pub title: String,
    pub blurb: String,
    pub price: Naira,
    pub original_price: Option<Naira>,
    pub fields: &'static [FormField],
}

const NAME_FIELDS: &[FormField] = &[
    FormField {
        name: "business_name_1",
        label: "Proposed name (first choice)",
        kind: FieldKind::Text,
        required: true,
        options: &[],
    },
    FormField {
        name: "business_name_2",
        label: "Proposed name (second choice)",
        kind: FieldKind::Text,
        required: false,
        options: &[],
    },
    FormField {
        name: "applicant_name",
        label: "Director's full name",
        kind: FieldKind::Text,
        required: true,
        options: &[],
    },
    FormField {
        name: "email",
        label: "Email address",
        kind: FieldKind::Email,
        required: true,
        options: &[],
    },
    FormField {
        name: "phone",
        label: "Phone number",
        kind: FieldKind::Tel,
        required: true,
        options: &[],
    },
    FormField {
        name: "address",
        label: "Business address",
        kind: FieldKind::Textarea,
        required: true,
        options: &[],
    },
];

/// The service offerings sold on the site.
pub const SERVICES: &[ServiceTemplate] = &[
    ServiceTemplate {
        id: "business-name",
        title: "Business Name Registration",
        blurb: "Register a sole proprietorship or enterprise name with the corporate registry.",
        default_price: Naira::new(25_000),
        fields: NAME_FIELDS,
    },
    ServiceTemplate {
        id: "company",
        title: "Limited Liability Company",
        blurb: "Incorporate a private limited company, share capital up to one million.",
        default_price: Naira::new(55_000),
        fields: NAME_FIELDS,
    },
    ServiceTemplate {
        id: "ngo",
        title: "NGO / Incorporated Trustees",
        blurb: "Register a non-profit, foundation, association or religious body.",
        default_price: Naira::new(150_000),
        fields: NAME_FIELDS,
    },
    ServiceTemplate {
        id: "trademark",
        title: "Trademark Registration",
        blurb: "Protect your brand name or logo with a registered trademark.",
        default_price: Naira::new(70_000),
        fields: NAME_FIELDS,
    },
    ServiceTemplate {
        id: "annual-returns",
        title: "Annual Returns Filing",
        blurb: "File outstanding annual returns and restore your company to good standing.",
        default_price: Naira::new(20_000),
        fields: NAME_FIELDS,
    },
    ServiceTemplate {
        id: "export-license",
        title: "Export License",
        blurb: "Obtain an export certificate for goods and produce.",
        default_price: Naira::new(85_000),
        fields: NAME_FIELDS,
    },
    ServiceTemplate {
        id: "tin",
        title: "Tax Identification Number",
        blurb: "Obtain a TIN for your registered business.",
        default_price: Naira::new(15_000),
        fields: NAME_FIELDS,
    },
];

/// Find a template by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static ServiceTemplate> {
    SERVICES.iter().find(|s| s.id == id)
}

/// Merge the built-in templates with server pricing rows.
///
/// The output preserves template order and always contains every template.
#[must_use]
pub fn merge_pricing(pricing: &[ServicePricing]) -> Vec<ServiceView> {
    SERVICES
        .iter()
        .map(|template| {
            let row = pricing.iter().find(|p| p.id == template.id);
            let price = row
                .and_then(|p| match Naira::parse_display(&p.price) {
                    Ok(amount) => Some(amount),
                    Err(e) => {
                        tracing::warn!(service = template.id, error = %e, "Ignoring unparsable price override");
                        None
                    }
                })
                .unwrap_or(template.default_price);
            let original_price = row
                .and_then(|p| p.original_price.as_deref())
                .and_then(|s| Naira::parse_display(s).ok());

            ServiceView {
                id: template.id.to_string(),
                title: template.title.to_string(),
                blurb: template.blurb.to_string(),
                price,
                original_price,
                fields: template.fields,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(id: &str, price: &str) -> ServicePricing {
        ServicePricing {
            id: id.to_string(),
            price: price.to_string(),
            original_price: None,
        }
    }

    #[test]
    fn test_catalog_has_seven_offerings() {
        assert_eq!(SERVICES.len(), 7);
        assert!(find("company").is_some());
        assert!(find("unknown").is_none());
    }

    #[test]
    fn test_merge_applies_server_override() {
        let merged = merge_pricing(&[row("company", "60000")]);
        let company = merged.iter().find(|s| s.id == "company").unwrap();
        assert_eq!(company.price, Naira::new(60_000));
        assert_eq!(company.price.to_string(), "\u{20a6}60,000");
    }

    #[test]
    fn test_merge_keeps_default_without_row() {
        let merged = merge_pricing(&[]);
        let company = merged.iter().find(|s| s.id == "company").unwrap();
        assert_eq!(company.price, Naira::new(55_000));
    }

    #[test]
    fn test_merge_ignores_unparsable_override() {
        let merged = merge_pricing(&[row("company", "call us")]);
        let company = merged.iter().find(|s| s.id == "company").unwrap();
        assert_eq!(company.price, Naira::new(55_000));
    }

    #[test]
    fn test_merge_parses_original_price() {
        let pricing = vec![ServicePricing {
            id: "company".to_string(),
            price: "55000".to_string(),
            original_price: Some("\u{20a6}75,000".to_string()),
        }];
        let merged = merge_pricing(&pricing);
        let company = merged.iter().find(|s| s.id == "company").unwrap();
        assert_eq!(company.original_price, Some(Naira::new(75_000)));
    }

    #[test]
    fn test_field_kind_input_type() {
        assert_eq!(FieldKind::Email.input_type(), "email");
        assert_eq!(FieldKind::Tel.input_type(), "tel");
        assert_eq!(FieldKind::Date.input_type(), "date");
        assert_eq!(FieldKind::Text.input_type(), "text");
    }
}
