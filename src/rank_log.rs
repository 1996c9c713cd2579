use std::cell::Cell;

use crate::communication::WorldRank;

thread_local! {
    static RANK: Cell<Option<WorldRank>> = Cell::new(None);
}

/// Records which rank the current thread runs as. Ranks run as
/// threads in local runs and as processes under MPI, so this is
/// per thread.
pub fn initialize(rank: WorldRank) {
    RANK.with(|r| r.set(Some(rank)));
}

pub fn current_rank() -> Option<WorldRank> {
    RANK.with(|r| r.get())
}

/// Threads that never called [`initialize`] count as the main rank.
pub fn on_main_rank() -> bool {
    current_rank().map(|rank| rank.is_main()).unwrap_or(true)
}

/// Logs at info level, but only on the main rank.
#[macro_export]
macro_rules! main_info {
    ($($arg:tt)+) => {
        if $crate::rank_log::on_main_rank() {
            log::info!($($arg)+);
        }
    };
}

/// Logs at debug level and adds the rank number to the beginning.
#[macro_export]
macro_rules! rank_debug {
    ($($arg:tt)+) => {
        match $crate::rank_log::current_rank() {
            Some(rank) => log::debug!("[rank {}] {}", *rank, format_args!($($arg)+)),
            None => log::debug!($($arg)+),
        }
    };
}

/// Like [`rank_debug`] at trace level.
#[macro_export]
macro_rules! rank_trace {
    ($($arg:tt)+) => {
        match $crate::rank_log::current_rank() {
            Some(rank) => log::trace!("[rank {}] {}", *rank, format_args!($($arg)+)),
            None => log::trace!($($arg)+),
        }
    };
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::current_rank;
    use super::initialize;
    use super::on_main_rank;
    use crate::communication::WorldRank;

    #[test]
    fn rank_is_per_thread() {
        thread::spawn(|| {
            initialize(WorldRank(3));
            assert_eq!(current_rank(), Some(WorldRank(3)));
            assert!(!on_main_rank());
        })
        .join()
        .unwrap();
        thread::spawn(|| {
            assert_eq!(current_rank(), None);
            assert!(on_main_rank());
        })
        .join()
        .unwrap();
    }
}
