mod fcm;

pub use fcm::FcmClient;
