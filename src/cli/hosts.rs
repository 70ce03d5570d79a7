use tabled::Table;

use crate::{
    config::StoreLocation, error, info, management::HostRepository, success, utils, warning,
};

/// Prints a host with its party summary and saved playlists, or deletes it.
pub async fn host(store: &StoreLocation, host_id: &str, delete: bool, force: bool) {
    let repo = open(store).await;

    if delete {
        if !force {
            if let Err(e) = super::ensure_not_served(store).await {
                error!("{}. Stop the server or pass --force.", e);
            }
        }
        match repo.delete_by_id(host_id).await {
            Ok(true) => success!("Deleted host {}.", host_id),
            Ok(false) => info!("Nothing to delete, host {} does not exist.", host_id),
            Err(e) => error!("Cannot delete host {}. Err: {}", host_id, e),
        }
        return;
    }

    let host = match repo.find_by_id(host_id).await {
        Ok(Some(h)) => h,
        Ok(None) => {
            warning!("Host {} not found.", host_id);
            return;
        }
        Err(e) => error!("Cannot load host {}. Err: {}", host_id, e),
    };

    info!(
        "Host {} ({})",
        host.id,
        host.name.as_deref().unwrap_or("unnamed")
    );
    match &host.party {
        Some(party) => info!(
            "Active party {} \"{}\": {} tracks, {} votes",
            party.id,
            party.name,
            party.tracks.len(),
            utils::total_votes(&party.tracks)
        ),
        None => info!("No active party."),
    }

    if host.playlists.is_empty() {
        info!("No saved playlists.");
    } else {
        println!("{}", Table::new(utils::playlist_table_rows(&host.playlists)));
    }
}

async fn open(store: &StoreLocation) -> HostRepository {
    match super::open_repository(store).await {
        Ok(r) => r,
        Err(e) => error!("Cannot open host store at {}. Err: {}", store, e),
    }
}
