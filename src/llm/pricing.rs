use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy)]
pub struct PriceEntry {
    /// USD per million input tokens.
    pub input: f64,
    /// USD per million output tokens.
    pub output: f64,
}

pub static PRICING: LazyLock<HashMap<&'static str, PriceEntry>> = LazyLock::new(|| {
    HashMap::from([
        (
            "gemini-1.5-flash",
            PriceEntry {
                input: 0.075,
                output: 0.30,
            },
        ),
        (
            "gemini-1.5-pro",
            PriceEntry {
                input: 1.25,
                output: 5.00,
            },
        ),
        (
            "gemini-2.0-flash",
            PriceEntry {
                input: 0.10,
                output: 0.40,
            },
        ),
    ])
});

/// Cost of a single call. Model names carry revision suffixes
/// ("-latest", "-002"), so fall back to the longest matching prefix.
pub fn calculate_cost(model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
    let entry = PRICING.get(model).copied().or_else(|| {
        PRICING
            .iter()
            .filter(|(name, _)| model.starts_with(*name))
            .max_by_key(|(name, _)| name.len())
            .map(|(_, entry)| *entry)
    });

    match entry {
        Some(entry) => {
            (f64::from(input_tokens) * entry.input / 1_000_000.0)
                + (f64::from(output_tokens) * entry.output / 1_000_000.0)
        }
        None => 0.0,
    }
}

pub static PROVIDER_SERVERS: LazyLock<HashMap<&str, &str>> =
    LazyLock::new(|| HashMap::from([("google", "generativelanguage.googleapis.com")]));

pub static PROVIDER_PORTS: LazyLock<HashMap<&str, i64>> =
    LazyLock::new(|| HashMap::from([("google", 443_i64)]));
