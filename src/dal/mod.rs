pub mod company_db;
