//! Single-record CRUD helpers
//!
//! Each helper issues exactly one statement at the requested consistency,
//! with no retry, and reports the round-trip time in milliseconds.

use super::models::{Review, ReviewKey, ReviewRecord};
use super::timing::elapsed_ms;
use crate::storage::{Consistency, Statement, StoreClient};
use crate::utils::error::Result;
use tokio::time::Instant;
use tracing::info;

/// Insert `record` under a freshly generated review id
pub async fn insert_single_review(
    client: &dyn StoreClient,
    record: ReviewRecord,
    consistency: Consistency,
) -> Result<(String, f64)> {
    let review = Review::with_generated_id(record);
    let review_id = review.review_id.clone();

    let start = Instant::now();
    client
        .execute(&Statement::InsertReview(review), consistency)
        .await?;
    let duration = elapsed_ms(start);

    info!("✅ Inserted record '{}' in {} ms", review_id, duration);
    Ok((review_id, duration))
}

/// Fetch one row by primary key
pub async fn read_single_review(
    client: &dyn StoreClient,
    asin: &str,
    review_id: &str,
    consistency: Consistency,
) -> Result<(Option<Review>, f64)> {
    let statement = Statement::SelectReview {
        key: ReviewKey::new(asin, review_id),
    };

    let start = Instant::now();
    let row = client
        .execute(&statement, consistency)
        .await?
        .into_rows()
        .into_iter()
        .next();
    let duration = elapsed_ms(start);

    info!("📖 Read record '{}' in {} ms", review_id, duration);
    Ok((row, duration))
}

/// Overwrite the rating of one row
pub async fn update_single_review(
    client: &dyn StoreClient,
    asin: &str,
    review_id: &str,
    rating: f32,
    consistency: Consistency,
) -> Result<f64> {
    let statement = Statement::UpdateRating {
        key: ReviewKey::new(asin, review_id),
        rating,
    };

    let start = Instant::now();
    client.execute(&statement, consistency).await?;
    let duration = elapsed_ms(start);

    info!("🔄 Updated rating for '{}' in {} ms", review_id, duration);
    Ok(duration)
}

/// Delete one row
pub async fn delete_single_review(
    client: &dyn StoreClient,
    asin: &str,
    review_id: &str,
    consistency: Consistency,
) -> Result<f64> {
    let statement = Statement::DeleteReview {
        key: ReviewKey::new(asin, review_id),
    };

    let start = Instant::now();
    client.execute(&statement, consistency).await?;
    let duration = elapsed_ms(start);

    info!("🗑️ Deleted record '{}' in {} ms", review_id, duration);
    Ok(duration)
}

/// The fixed record used by the single-operation suite
pub fn sample_record() -> ReviewRecord {
    ReviewRecord {
        asin: "B00YQ6X8EO".to_string(),
        user_id: "AGKHLEW2SOWHNMFQIJGBECAF7INQ".to_string(),
        title: "Such a lovely scent but not overpowering.".to_string(),
        text: "This spray is really nice. It smells really good, goes on really fine, and does \
               the trick. I have a lot of hair, medium thickness. I am comparing to other brands \
               with yucky chemicals so I'm gonna stick with this. Try it!"
            .to_string(),
        rating: 5.0,
        timestamp: 1588687728923,
        helpful_vote: 0,
        verified_purchase: true,
    }
}
