mod update_poller;

pub use update_poller::UpdatePoller;
