pub mod activity_logs;
pub mod carousel_slides;
pub mod donation_programs;
pub mod donations;
pub mod news;
pub mod transactions;
pub mod users;

pub use activity_logs::Entity as ActivityLogs;
pub use activity_logs::Model as ActivityLog;
pub use carousel_slides::Entity as CarouselSlides;
pub use carousel_slides::Model as CarouselSlide;
pub use donation_programs::Entity as DonationPrograms;
pub use donation_programs::Model as DonationProgram;
pub use donations::{DonationStatus, Entity as Donations, Model as Donation};
pub use news::Entity as News;
pub use news::Model as NewsItem;
pub use transactions::{Entity as Transactions, Model as Transaction, TransactionKind};
pub use users::{Entity as Users, Model as User, Role};
