pub mod relay;

pub use relay::ChatRelayService;
