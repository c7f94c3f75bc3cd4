mod telegram_client;

pub use telegram_client::{DEFAULT_API_BASE_URL, MAX_MESSAGE_CHARS, TelegramClient, split_message};
