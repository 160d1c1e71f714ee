use chrono::{Duration, Utc};
use clap::Parser;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use tuition::{
    auth,
    domain::{BillingType, CreateEnrollmentRequest, CreateProfileRequest, NewPayment, Role},
    repository::{
        EnrollmentRepository, PaymentRepository, ProfileRepository,
        SqliteEnrollmentRepository, SqlitePaymentRepository, SqliteProfileRepository,
    },
};

/// Seeds a student with a pending enrollment and charge for local webhook testing.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://tuition.db?mode=rwc")]
    database_url: String,

    /// Gateway charge id for the pending payment.
    #[arg(long, default_value = "pay_123")]
    charge_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let profile_repo = SqliteProfileRepository::new(db_pool.clone());
    let enrollment_repo = SqliteEnrollmentRepository::new(db_pool.clone());
    let payment_repo = SqlitePaymentRepository::new(db_pool.clone());

    let student = match profile_repo.find_by_email("student@tuition.local").await? {
        Some(existing) => existing,
        None => {
            profile_repo.create(CreateProfileRequest {
                email: "student@tuition.local".to_string(),
                full_name: "Student User".to_string(),
                role: Role::Student,
                phone: None,
                document: None,
                password_hash: auth::hash_password("student123")?,
            }).await?
        }
    };
    println!("  ✅ Student {} (student@tuition.local / student123)", student.id);

    let enrollment = enrollment_repo.create(CreateEnrollmentRequest {
        student_id: student.id,
        course_offering_id: Uuid::new_v4(),
    }).await?;
    println!("  ✅ Pending enrollment {}", enrollment.id);

    let payment = payment_repo.upsert(NewPayment {
        gateway_payment_id: args.charge_id.clone(),
        enrollment_id: Some(enrollment.id),
        customer_id: Some("cus_seed".to_string()),
        value_cents: 29700,
        due_date: Some((Utc::now() + Duration::days(3)).date_naive()),
        billing_type: BillingType::Pix,
        description: Some("Course enrollment".to_string()),
        invoice_url: None,
        installment_count: None,
    }).await?;
    println!("  ✅ Pending charge {} ({})", payment.gateway_payment_id, payment.status.as_str());

    db_pool.close().await;

    println!("🎉 Seeding complete");

    Ok(())
}
