//! Startup seeding
//!
//! Ensures the protected teams exist and that the single default
//! customer-info row (id = 1) is present. Safe to run on every boot.

use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::models::{customer_info, team};
use crate::repositories::team::PROTECTED_TEAMS;

/// Seeds the teams table with the protected teams and plants the default
/// customer-info row.
pub async fn seed_database(db: &DatabaseConnection) -> Result<()> {
    for name in PROTECTED_TEAMS {
        let exists = team::Entity::find()
            .filter(team::Column::Name.eq(name))
            .one(db)
            .await?
            .is_some();

        if exists {
            log::info!("Team '{}' already exists, skipping", name);
            continue;
        }

        log::info!("Creating protected team: {}", name);
        team::ActiveModel {
            name: Set(name.to_string()),
            description: Set(String::new()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    let info_exists = customer_info::Entity::find_by_id(1).one(db).await?.is_some();
    if !info_exists {
        log::info!("Creating default customer info row");
        customer_info::ActiveModel {
            id: Set(1),
            customer_name: Set("제일좋은집 찾아드릴분".to_string()),
            move_in_date: Set(String::new()),
        }
        .insert(db)
        .await?;
    }

    log::info!("Database seeding completed successfully");
    Ok(())
}
