//! Market Price Board
//!
//! Simulated prices at nearby agricultural markets, standing in for a real
//! market-data feed. Prices are in Indian Rupees per trading unit.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Crops traded at the simulated markets
pub const TRADED_CROPS: [&str; 10] = [
    "Rice", "Wheat", "Maize", "Soybean", "Cotton", "Sugarcane", "Potato", "Tomato", "Onion", "Chili",
];

const MARKET_PREFIXES: [&str; 10] = [
    "Central", "City", "District", "Regional", "Rural", "Urban", "Farmers", "Agricultural",
    "Community", "Wholesale",
];

const MARKET_SUFFIXES: [&str; 10] = [
    "Market", "Mandi", "Trading Center", "Bazaar", "Marketplace", "Farmers Market",
    "Agricultural Market", "Produce Market", "Trading Hub", "Exchange",
];

/// Fallback base price for crops without a listed price
const DEFAULT_BASE_PRICE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingUnit {
    Quintal,
    Ton,
    Kg,
}

impl TradingUnit {
    /// Grains and pulses trade by the quintal, cane by the ton, produce by the kg
    pub fn for_crop(crop: &str) -> Self {
        match crop {
            "Rice" | "Wheat" | "Maize" | "Soybean" => TradingUnit::Quintal,
            "Sugarcane" => TradingUnit::Ton,
            _ => TradingUnit::Kg,
        }
    }
}

/// Base price (INR per trading unit)
pub fn base_price(crop: &str) -> f64 {
    match crop {
        "Rice" => 2000.0,
        "Wheat" => 1950.0,
        "Maize" => 1850.0,
        "Soybean" => 3800.0,
        "Cotton" => 6000.0,
        "Sugarcane" => 3000.0,
        "Potato" => 25.0,
        "Tomato" => 35.0,
        "Onion" => 30.0,
        "Chili" => 80.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPrice {
    pub name: String,
    pub price: f64,
    pub unit: TradingUnit,
    pub trend: PriceTrend,
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Market {
    pub name: String,
    /// Distance from the requested coordinates (km)
    pub distance: f64,
    pub crops: Vec<CropPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketData {
    pub markets: Vec<Market>,
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn simulate_price<R: Rng>(crop: &str, rng: &mut R) -> CropPrice {
    let base = base_price(crop);
    let variation = rng.gen_range(-0.2..0.2_f64) * base; // ±20%

    let trend = if rng.gen_bool(0.33) {
        PriceTrend::Down
    } else if rng.gen_bool(0.66) {
        PriceTrend::Up
    } else {
        PriceTrend::Stable
    };

    let magnitude = (rng.gen_range(0.0..10.0_f64) * 10.0).round() / 10.0;
    let change_percent = match trend {
        PriceTrend::Stable => 0.0,
        PriceTrend::Up => magnitude,
        PriceTrend::Down => -magnitude,
    };

    CropPrice {
        name: crop.to_string(),
        price: round_to_cents(base + variation),
        unit: TradingUnit::for_crop(crop),
        trend,
        change_percent,
    }
}

/// Simulate the price board around a location
///
/// 3-5 markets within 1-30 km, each trading 5-10 distinct crops, nearest
/// market first. Coordinates are accepted for interface parity with a real
/// feed; the simulation does not depend on them.
pub fn simulate_market_data<R: Rng>(_lat: f64, _lng: f64, rng: &mut R) -> MarketData {
    let market_count = rng.gen_range(3..=5);
    let mut markets = Vec::with_capacity(market_count);

    for _ in 0..market_count {
        let distance = rng.gen_range(1.0..30.0);
        let name = format!(
            "{} {}",
            MARKET_PREFIXES.choose(rng).copied().unwrap_or("Central"),
            MARKET_SUFFIXES.choose(rng).copied().unwrap_or("Market"),
        );

        let crop_count = rng.gen_range(5..=10);
        let crops = TRADED_CROPS
            .choose_multiple(rng, crop_count)
            .map(|crop| simulate_price(crop, rng))
            .collect::<Vec<_>>();

        markets.push(Market { name, distance, crops });
    }

    markets.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    MarketData { markets }
}
