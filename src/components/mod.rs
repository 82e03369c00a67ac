pub mod header;
pub mod claim_page;
pub mod nft_preview;
pub mod connection_status;
pub mod share;

pub use header::Header;
pub use claim_page::ClaimPage;
pub use nft_preview::NftPreview;
pub use connection_status::ConnectionStatus;
pub use share::SocialShareButton;
