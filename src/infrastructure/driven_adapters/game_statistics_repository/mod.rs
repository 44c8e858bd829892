//! Game Statistics Repository Implementations

mod mariadb;

pub use mariadb::MariaDbGameStatisticsRepository;
