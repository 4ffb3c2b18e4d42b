use tabled::Table;

use crate::{error, spotify, types::ProfileTableRow};

pub async fn me() {
    let config = super::load_config();
    let client = super::connect(&config).await;

    let profile = match spotify::profile::get_current_user(&client).await {
        Ok(profile) => profile,
        Err(e) => error!("Failed to fetch user profile: {}", e),
    };

    let row = ProfileTableRow {
        id: profile.id,
        name: profile.display_name.unwrap_or_default(),
        email: profile.email.unwrap_or_default(),
        country: profile.country.unwrap_or_default(),
        product: profile.product.unwrap_or_default(),
    };

    println!("{}", Table::new(vec![row]));
}
