//! Card construction and phrasing pools.
//!
//! Each category has a pool of lexically distinct, semantically equivalent
//! statements. The pools deliberately avoid every bin name so a card's text
//! never gives away its classification; the learner has to reason from the
//! economics, not the vocabulary.
//!
//! Distractors come from separate per-ledger pools. They describe second-hand
//! sales, asset swaps and transfer payments: transactions that belong to no
//! aggregate, so their correct bin is the ledger's exclusion bin.

use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use crate::{Card, CardKind, Category, EngineError, Ledger, Millions, ResultEngine};

pub(crate) const OUTPUT_PHRASES: &[&str] = &[
    "Market value of everything {firm} made this year",
    "{firm} invoices customers for its year of finished goods",
    "The annual product of {firm}'s plants, valued at sale prices",
    "{firm} turns out a year's worth of goods for sale",
];

pub(crate) const DOMESTIC_INPUT_PHRASES: &[&str] = &[
    "{firm} buys parts and materials from {supplier}",
    "Supplies {firm} purchases from {supplier} and uses up making its goods",
    "{firm} pays {supplier} for components consumed on its lines",
];

pub(crate) const IMPORTED_INPUT_PHRASES: &[&str] = &[
    "{firm} buys raw materials from suppliers abroad",
    "Materials {firm} sources overseas and processes in its plants",
    "{firm} pays foreign mills for inputs its lines use up",
];

pub(crate) const CONSUMPTION_PHRASES: &[&str] = &[
    "Households buy food, clothing and everyday services",
    "What families spend at shops and service providers",
    "Private purchases of final goods by resident households",
    "Spending by households on the goods of daily life",
];

pub(crate) const FIXED_INVESTMENT_PHRASES: &[&str] = &[
    "Firms install new machinery on their shop floors",
    "Businesses put up new halls and buy new tooling",
    "Companies acquire durable plant to expand capacity",
];

pub(crate) const INVENTORY_PHRASES: &[&str] = &[
    "The value of goods sitting in producers' warehouses changes over the year",
    "Finished goods in storage end the year at a different level than they began",
    "Producers' stocks of unsold goods move over the course of the year",
];

pub(crate) const GOVERNMENT_PHRASES: &[&str] = &[
    "The state pays for schooling, policing and public administration",
    "Public agencies procure goods and services from the market",
    "Ministries and municipalities pay for the services they deliver",
];

pub(crate) const EXPORTS_PHRASES: &[&str] = &[
    "Foreign customers take delivery of domestically made goods",
    "Goods shipped to buyers outside the country",
    "Sales by resident producers to customers abroad",
];

pub(crate) const IMPORTS_PHRASES: &[&str] = &[
    "Residents and firms buy goods produced abroad",
    "Purchases of foreign-made goods and services by residents",
    "Goods brought into the country from producers overseas",
];

pub(crate) const WAGE_PHRASES: &[&str] = &[
    "{firm} pays its workforce for the year",
    "Yearly payroll handed out at {firm}",
    "What {firm}'s employees take home in pay",
];

pub(crate) const PROFIT_PHRASES: &[&str] = &[
    "What remains at {firm} for its owners after paying staff and suppliers",
    "{firm}'s surplus accruing to its shareholders",
    "Earnings {firm}'s owners keep or distribute",
];

const PRODUCTION_DISTRACTOR_PHRASES: &[&str] = &[
    "A fleet of used delivery vans changes hands between two firms",
    "Shares in a listed manufacturer are traded on the exchange",
    "A warehouse built years ago is sold to a new owner",
];

const EXPENDITURE_DISTRACTOR_PHRASES: &[&str] = &[
    "Households move savings into fixed-term bank deposits",
    "A family buys a thirty-year-old townhouse",
    "A pension fund adds state bonds to its portfolio",
];

const INCOME_DISTRACTOR_PHRASES: &[&str] = &[
    "Retirees draw their state pensions",
    "Students receive public scholarship stipends",
    "A household collects a lottery prize",
];

/// Distractor amounts are drawn independently of the identity.
const DISTRACTOR_AMOUNT_RANGE: std::ops::RangeInclusive<i64> = 5..=40;

/// Builds one card with a phrasing drawn uniformly from `pool`.
///
/// Returns [`EngineError::EmptyPool`] on an empty pool. The pools used by the
/// round generator are compile-time constants, so that path is construction
/// misuse by an external caller, never a runtime failure of a round.
pub fn make_card(
    rng: &mut SmallRng,
    ledger: Ledger,
    amount: Millions,
    correct_bin: Category,
    kind: Option<CardKind>,
    pool: &[String],
) -> ResultEngine<Card> {
    let text = pool
        .choose(rng)
        .ok_or_else(|| EngineError::EmptyPool(format!("no phrasings for {}", correct_bin.as_str())))?
        .clone();
    Ok(Card {
        id: card_id(rng),
        ledger,
        amount,
        text,
        correct_bin,
        kind,
    })
}

/// Builds a distractor for `ledger`: amount independent of the identity,
/// correct bin guaranteed to be the ledger's exclusion bin.
pub fn make_distractor(rng: &mut SmallRng, ledger: Ledger) -> Card {
    let pool = match ledger {
        Ledger::Production => PRODUCTION_DISTRACTOR_PHRASES,
        Ledger::Expenditure => EXPENDITURE_DISTRACTOR_PHRASES,
        Ledger::Income => INCOME_DISTRACTOR_PHRASES,
    };
    let amount = Millions::new(rng.random_range(DISTRACTOR_AMOUNT_RANGE));
    // Static pools are never empty; index directly rather than erroring.
    let text = pool[rng.random_range(0..pool.len())].to_string();
    Card {
        id: card_id(rng),
        ledger,
        amount,
        text,
        correct_bin: Category::exclusion_for(ledger),
        kind: None,
    }
}

/// Renders a template pool, substituting firm and supplier names.
pub(crate) fn render_pool(pool: &[&str], firm: &str, supplier: &str) -> Vec<String> {
    pool.iter()
        .map(|template| template.replace("{firm}", firm).replace("{supplier}", supplier))
        .collect()
}

/// Card ids come from the round's RNG stream, not the OS: the same seed must
/// reproduce the same scenario, ids included.
fn card_id(rng: &mut SmallRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}
