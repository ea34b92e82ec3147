//! Command execution.
//!
//! [`Execute`] moves the work for each [`Command`] variant out of the session
//! loop, which only parses lines and reports errors.

use anyhow::Result;
use std::cmp::Ordering;
use tracing::info;

use super::session::Session;
use super::{Command, COMMANDS};
use crate::codec;
use crate::error::StockError;

pub trait Execute {
    fn execute(self, session: &mut Session) -> Result<()>;
}

impl Execute for Command {
    fn execute(self, session: &mut Session) -> Result<()> {
        match self {
            Command::Help => help(session),
            Command::Info => show_info(session),
            Command::Show | Command::PrintAscending => print_ascending(session),
            Command::Add => add(session),
            Command::UpdateId(id) => update_id(session, id),
            Command::RemoveById(id) => remove_by_id(session, id),
            Command::Clear => {
                let removed = session.collection.len();
                session.collection.clear();
                session
                    .output
                    .success(&format!("Removed {} products", removed));
                Ok(())
            }
            Command::Save => {
                let count = codec::save(session.store.as_ref(), &session.collection)?;
                session.output.success(&format!(
                    "Saved {} products to {}",
                    count,
                    session.store.describe()
                ));
                Ok(())
            }
            Command::ExecuteScript(path) => session.run_script(&path),
            Command::Exit => {
                session.stop();
                Ok(())
            }
            Command::AddIfMin => add_if_min(session),
            Command::RemoveLower => remove_lower(session),
            Command::History => {
                for entry in session.history.entries() {
                    session.output.result(entry);
                }
                Ok(())
            }
            Command::CountLessThanManufacturer => {
                let reference = session.prompt_organization()?;
                let count = session.collection.count_manufacturer_below(&reference);
                session.output.result(&count.to_string());
                Ok(())
            }
            Command::PrintFieldDescendingManufacturer => {
                for org in session.collection.manufacturers_descending() {
                    session
                        .output
                        .record(&org.to_string(), codec::organization_value(org));
                }
                Ok(())
            }
        }
    }
}

fn help(session: &Session) -> Result<()> {
    for (name, args, description) in COMMANDS {
        let synopsis = if args.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, args)
        };
        session
            .output
            .result(&format!("{} : {}", synopsis, description));
    }
    Ok(())
}

fn show_info(session: &Session) -> Result<()> {
    let collection = &session.collection;
    session.output.record(
        &format!(
            "CollectionType: {}\nInitializationDate: {}\nSize: {}",
            collection.kind(),
            collection.created_at().to_rfc3339(),
            collection.len()
        ),
        serde_json::json!({
            "CollectionType": collection.kind(),
            "InitializationDate": collection.created_at().to_rfc3339(),
            "Size": collection.len(),
        }),
    );
    Ok(())
}

fn print_ascending(session: &Session) -> Result<()> {
    if session.collection.is_empty() {
        session.output.warn("Collection is empty");
        return Ok(());
    }
    for product in session.collection.ascending() {
        session
            .output
            .record(&format!("{}\n", product), codec::product_value(product));
    }
    Ok(())
}

fn add(session: &mut Session) -> Result<()> {
    let product = session.prompt_product(None, true)?;
    let id = product.id();
    session.collection.add(product)?;
    session.output.success(&format!("Added product {}", id));
    Ok(())
}

fn update_id(session: &mut Session, id: i64) -> Result<()> {
    let existing = session
        .collection
        .get(id)
        .cloned()
        .ok_or(StockError::NotFound(id))?;
    let product = session.prompt_product(Some(&existing), true)?;
    session.collection.replace(id, product)?;
    session.output.success(&format!("Updated product {}", id));
    Ok(())
}

fn remove_by_id(session: &mut Session, id: i64) -> Result<()> {
    if session.collection.remove_by_id(id) {
        session.output.success(&format!("Removed product {}", id));
    } else {
        session.output.warn(&format!("No product with id {}", id));
    }
    Ok(())
}

fn add_if_min(session: &mut Session) -> Result<()> {
    let product = session.prompt_product(None, true)?;
    let lowest = match session.collection.min() {
        Ok(min) => product.price_cmp(min) == Ordering::Less,
        Err(StockError::EmptyCollection) => true,
        Err(err) => return Err(err.into()),
    };
    if !lowest {
        info!(id = product.id(), "add_if_min discarded product");
        session
            .output
            .warn("Product is not cheaper than the current minimum; not added");
        return Ok(());
    }
    let id = product.id();
    session.collection.add(product)?;
    session.output.success(&format!("Added product {}", id));
    Ok(())
}

fn remove_lower(session: &mut Session) -> Result<()> {
    let reference = session.prompt_product(None, false)?;
    let removed = session.collection.remove_lower(&reference);
    session
        .output
        .success(&format!("Removed {} products", removed.len()));
    Ok(())
}
