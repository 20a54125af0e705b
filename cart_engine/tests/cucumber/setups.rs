use std::str::FromStr;

use cart_engine::db_types::Money;
use cucumber::{given, when};

use crate::cucumber::{cart_world::CommerceSystem, CartWorld};

#[given("a fresh ledger")]
async fn fresh_ledger(world: &mut CartWorld) {
    let system = CommerceSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "the catalog prices product {word} at {word}")]
async fn list_price(world: &mut CartWorld, product: String, price: String) {
    set_price(world, &product, &price);
}

#[when(expr = "the catalog price of product {word} changes to {word}")]
async fn change_price(world: &mut CartWorld, product: String, price: String) {
    set_price(world, &product, &price);
}

fn set_price(world: &CartWorld, product: &str, price: &str) {
    let price = Money::from_str(price).expect("Not a valid price");
    world.system().prices.set_price(product, price);
}

#[when("the catalog goes offline")]
async fn catalog_offline(world: &mut CartWorld) {
    world.system().prices.set_offline(true);
}

#[when("the catalog comes back online")]
async fn catalog_online(world: &mut CartWorld) {
    world.system().prices.set_offline(false);
}
