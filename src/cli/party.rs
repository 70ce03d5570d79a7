use tabled::Table;

use crate::{
    config::StoreLocation, error, info, management::RepositoryError, success, utils, warning,
};

/// Prints the queue of a host's active party, or clears the party.
pub async fn party(store: &StoreLocation, host_id: &str, clear: bool, force: bool) {
    let repo = match super::open_repository(store).await {
        Ok(r) => r,
        Err(e) => error!("Cannot open host store at {}. Err: {}", store, e),
    };

    if clear {
        if !force {
            if let Err(e) = super::ensure_not_served(store).await {
                error!("{}. Stop the server or pass --force.", e);
            }
        }
        match repo.clear_party(host_id).await {
            Ok(Some(_)) => success!("Party of host {} cleared.", host_id),
            Ok(None) => warning!("Host {} not found.", host_id),
            Err(e) => error!("Cannot clear party of host {}. Err: {}", host_id, e),
        }
        return;
    }

    match repo.get_party_tracks(host_id).await {
        Ok(tracks) if tracks.is_empty() => info!("Party queue of host {} is empty.", host_id),
        Ok(tracks) => {
            println!("{}", Table::new(utils::track_table_rows(&tracks)));
            info!(
                "{} tracks, {} votes in total.",
                tracks.len(),
                utils::total_votes(&tracks)
            );
        }
        Err(RepositoryError::NotFound(msg)) => warning!("{}", msg),
        Err(e) => error!("Cannot load party of host {}. Err: {}", host_id, e),
    }
}
