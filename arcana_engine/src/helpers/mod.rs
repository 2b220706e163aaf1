pub mod cpf;
pub mod fees;
pub mod ids;
