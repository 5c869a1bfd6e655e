use std::{sync::Arc, thread::scope};

use streamkit::{Identifiable, InstallReport, Registry};

/// Registers `registrants` into `registry` from `workers` threads.
///
/// Registrants are dealt round-robin, so with more than one worker the
/// resulting insertion order is not the input order.
pub fn register_concurrently<T, R>(
    registry: &R,
    registrants: Vec<Arc<T>>,
    workers: usize,
) -> InstallReport
where
    T: Identifiable + Send + Sync + ?Sized,
    R: Registry<T> + Sync,
{
    let workers = workers.max(1);
    let mut shares: Vec<Vec<Arc<T>>> = (0..workers).map(|_| Vec::new()).collect();
    for (index, registrant) in registrants.into_iter().enumerate() {
        shares[index % workers].push(registrant);
    }

    scope(|s| {
        let handles: Vec<_> = shares
            .into_iter()
            .enumerate()
            .map(|(worker, share)| {
                s.spawn(move || {
                    let mut report = InstallReport::default();
                    for registrant in share {
                        let id = registrant.id().to_owned();
                        let outcome = registry.try_register(registrant);
                        tracing::debug!(worker, id = %id, ?outcome, "registered");
                        report.record(id, outcome);
                    }
                    report
                })
            })
            .collect();

        handles
            .into_iter()
            .fold(InstallReport::default(), |mut total, handle| {
                match handle.join() {
                    Ok(report) => total.merge(report),
                    Err(_) => tracing::error!("registration worker panicked"),
                }
                total
            })
    })
}
