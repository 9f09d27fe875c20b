//! Shopping-trends request set.
//!
//! Column names, dataset schema, and the named aggregation requests used to
//! profile customers, seasons, categories, and subscription behaviour over a
//! retail transactions table.

use crate::core::{
    aggregate::Aggregator,
    config::EngineConfig,
    error::Error,
    group::GroupKey,
    pipeline::Pipeline,
    predicate::Predicate,
    request::{AggregationRequest, SortBy},
    summary::SummaryTable,
    table::{ColumnDef, ColumnType, Schema, Table},
};

///
/// COLUMNS
///

pub const CUSTOMER_ID: &str = "Customer ID";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const ITEM_PURCHASED: &str = "Item Purchased";
pub const CATEGORY: &str = "Category";
pub const PURCHASE_AMOUNT: &str = "Purchase Amount (USD)";
pub const LOCATION: &str = "Location";
pub const SIZE: &str = "Size";
pub const COLOR: &str = "Color";
pub const SEASON: &str = "Season";
pub const REVIEW_RATING: &str = "Review Rating";
pub const SUBSCRIPTION_STATUS: &str = "Subscription Status";
pub const PAYMENT_METHOD: &str = "Payment Method";
pub const SHIPPING_TYPE: &str = "Shipping Type";
pub const DISCOUNT_APPLIED: &str = "Discount Applied";
pub const PROMO_CODE_USED: &str = "Promo Code Used";
pub const PREVIOUS_PURCHASES: &str = "Previous Purchases";
pub const PREFERRED_PAYMENT_METHOD: &str = "Preferred Payment Method";
pub const FREQUENCY: &str = "Frequency of Purchases";

/// Derived by `prepare`.
pub const AGE_GROUP: &str = "Age Group";

/// Right-closed age bands: (0, 25], (25, 45], (45, 65], (65, 100].
pub const AGE_BINS: [f64; 5] = [0.0, 25.0, 45.0, 65.0, 100.0];

/// Purchase frequencies counted as loyal.
pub const LOYAL_FREQUENCIES: [&str; 2] = ["Weekly", "Fortnightly"];

// output columns
pub const TOTAL_SPENDING: &str = "total_spending";
pub const PURCHASE_FREQUENCY: &str = "purchase_frequency";
pub const CUSTOMERS: &str = "customers";
pub const SHARE: &str = "share";
pub const PURCHASES: &str = "purchases";

/// Declared column types of the shopping-trends dataset.
pub fn schema() -> Result<Schema, Error> {
    Schema::new(vec![
        ColumnDef::new(CUSTOMER_ID, ColumnType::Int),
        ColumnDef::new(AGE, ColumnType::Int),
        ColumnDef::new(GENDER, ColumnType::Category),
        ColumnDef::new(ITEM_PURCHASED, ColumnType::Category),
        ColumnDef::new(CATEGORY, ColumnType::Category),
        ColumnDef::new(PURCHASE_AMOUNT, ColumnType::Float),
        ColumnDef::new(LOCATION, ColumnType::Category),
        ColumnDef::new(SIZE, ColumnType::Category),
        ColumnDef::new(COLOR, ColumnType::Category),
        ColumnDef::new(SEASON, ColumnType::Category),
        ColumnDef::new(REVIEW_RATING, ColumnType::Float),
        ColumnDef::new(SUBSCRIPTION_STATUS, ColumnType::Category),
        ColumnDef::new(PAYMENT_METHOD, ColumnType::Category),
        ColumnDef::new(SHIPPING_TYPE, ColumnType::Category),
        ColumnDef::new(DISCOUNT_APPLIED, ColumnType::Category),
        ColumnDef::new(PROMO_CODE_USED, ColumnType::Category),
        ColumnDef::new(PREVIOUS_PURCHASES, ColumnType::Int),
        ColumnDef::new(PREFERRED_PAYMENT_METHOD, ColumnType::Category),
        ColumnDef::new(FREQUENCY, ColumnType::Category),
    ])
}

/// Add the age-group column the standard pipeline groups by.
pub fn prepare(table: &Table) -> Result<Table, Error> {
    table.bin(AGE, &AGE_BINS, AGE_GROUP)
}

///
/// REQUESTS
///

/// Total spending and purchase count per customer, highest spenders first.
#[must_use]
pub fn customer_analysis() -> AggregationRequest {
    AggregationRequest::by(CUSTOMER_ID)
        .aggregate(Aggregator::sum(PURCHASE_AMOUNT).alias(TOTAL_SPENDING))
        .aggregate(Aggregator::count(CUSTOMER_ID).alias(PURCHASE_FREQUENCY))
        .sort_by(SortBy::column(TOTAL_SPENDING))
}

#[must_use]
pub fn seasonal_spending() -> AggregationRequest {
    mean_spending_by(SEASON)
}

/// Season by category purchase totals; reshape with `to_matrix`.
#[must_use]
pub fn seasonal_category() -> AggregationRequest {
    total_spending_by([SEASON, CATEGORY])
}

/// Customer count per subscription status. `subscription_loyalty` adds the
/// percentage column.
#[must_use]
pub fn subscription_share() -> AggregationRequest {
    AggregationRequest::by(SUBSCRIPTION_STATUS)
        .aggregate(Aggregator::count(SUBSCRIPTION_STATUS).alias(CUSTOMERS))
}

/// Purchase-frequency counts per subscription status: statuses ascending,
/// most common frequency first within each.
#[must_use]
pub fn frequency_by_subscription() -> AggregationRequest {
    AggregationRequest::by([SUBSCRIPTION_STATUS, FREQUENCY])
        .aggregate(Aggregator::count(FREQUENCY).alias(PURCHASES))
        .sort_by(SortBy::column_within_outer_key(PURCHASES))
}

#[must_use]
pub fn spending_by_subscription() -> AggregationRequest {
    mean_spending_by(SUBSCRIPTION_STATUS)
}

#[must_use]
pub fn spending_by_frequency() -> AggregationRequest {
    mean_spending_by(FREQUENCY)
}

#[must_use]
pub fn spending_by_gender() -> AggregationRequest {
    mean_spending_by(GENDER)
}

/// Requires the column added by `prepare`.
#[must_use]
pub fn spending_by_age_group() -> AggregationRequest {
    mean_spending_by(AGE_GROUP)
}

/// Purchase totals per category, best sellers first.
#[must_use]
pub fn category_sales() -> AggregationRequest {
    total_spending_by(CATEGORY).sort_by(SortBy::column(TOTAL_SPENDING))
}

#[must_use]
pub fn size_demand() -> AggregationRequest {
    total_spending_by([CATEGORY, SIZE])
}

#[must_use]
pub fn color_demand() -> AggregationRequest {
    total_spending_by([CATEGORY, COLOR])
}

/// Purchases per category, most frequent first.
#[must_use]
pub fn category_preference() -> AggregationRequest {
    value_counts(CATEGORY)
}

/// Purchases per payment method, most frequent first. Pass
/// `PAYMENT_METHOD` or `PREFERRED_PAYMENT_METHOD`.
#[must_use]
pub fn payment_preference(column: &str) -> AggregationRequest {
    value_counts(column)
}

fn mean_spending_by(key: &str) -> AggregationRequest {
    AggregationRequest::by(key).aggregate(Aggregator::mean(PURCHASE_AMOUNT))
}

fn total_spending_by(key: impl Into<GroupKey>) -> AggregationRequest {
    AggregationRequest::by(key).aggregate(Aggregator::sum(PURCHASE_AMOUNT).alias(TOTAL_SPENDING))
}

/// Purchases per value of `column`, most frequent first.
#[must_use]
pub fn value_counts(column: &str) -> AggregationRequest {
    AggregationRequest::by(column)
        .aggregate(Aggregator::count(column).alias(PURCHASES))
        .sort_by(SortBy::column(PURCHASES))
}

///
/// PIPELINE
///

/// The standard request set, to be run against a `prepare`d table.
#[must_use]
pub fn pipeline(config: EngineConfig) -> Pipeline {
    Pipeline::new(config)
        .request("customer_analysis", customer_analysis())
        .request("seasonal_spending", seasonal_spending())
        .request("seasonal_category", seasonal_category())
        .request("subscription_share", subscription_share())
        .request("frequency_by_subscription", frequency_by_subscription())
        .request("spending_by_subscription", spending_by_subscription())
        .request("spending_by_frequency", spending_by_frequency())
        .request("spending_by_gender", spending_by_gender())
        .request("spending_by_age_group", spending_by_age_group())
        .request("category_sales", category_sales())
        .request("size_demand", size_demand())
        .request("color_demand", color_demand())
}

///
/// SEGMENTS
///

/// Subscription counts with a percentage share column.
pub fn subscription_loyalty(table: &Table) -> Result<SummaryTable, Error> {
    subscription_share().apply(table)?.with_share(CUSTOMERS, SHARE)
}

/// Rows of customers whose total spending exceeds the `p` quantile of all
/// customers' totals.
pub fn high_value_customers(table: &Table, p: f64) -> Result<Table, Error> {
    let spending = customer_analysis().apply(table)?;
    let Some(threshold) = spending.quantile(TOTAL_SPENDING, p)? else {
        return Ok(Table::empty(table.schema().clone()));
    };
    let customers = spending.keys_where(TOTAL_SPENDING, |total| total > threshold)?;

    table.filter(&Predicate::is_in(CUSTOMER_ID, customers))
}

/// Rows of subscribed customers who buy weekly or fortnightly.
pub fn loyal_customers(table: &Table) -> Result<Table, Error> {
    let loyal = Predicate::eq(SUBSCRIPTION_STATUS, "Yes")
        .and(Predicate::is_in(FREQUENCY, LOYAL_FREQUENCIES));

    table.filter(&loyal)
}
