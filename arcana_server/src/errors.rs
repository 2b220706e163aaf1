use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use arcana_engine::traits::{AuthApiError, LedgerError, OrderFlowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Could not process the order. {0}")]
    OrderFlow(OrderFlowError),
    #[error("Could not process the ledger request. {0}")]
    Ledger(LedgerError),
    #[error("The payment gateway rejected the request. {0}")]
    PaymentGatewayError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::OrderFlow(e) => match e {
                OrderFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                OrderFlowError::OrderNotFound(_) | OrderFlowError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
                OrderFlowError::NotYourOrder(_) => StatusCode::FORBIDDEN,
                OrderFlowError::InvalidTransition { .. } => StatusCode::CONFLICT,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::Ledger(e) => match e {
                LedgerError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string(), "message": self.user_message() }).to_string())
    }
}

impl ServerError {
    /// The user-facing message, in Portuguese, that frontends show verbatim. The `error` field
    /// keeps the technical description for logs and support.
    pub fn user_message(&self) -> String {
        let msg = match self {
            Self::AuthenticationError(_) => "Sessão inválida ou expirada. Faça login novamente.",
            Self::InvalidRequestBody(_) => "Não foi possível entender a requisição.",
            Self::PaymentGatewayError(_) => "Não foi possível iniciar o pagamento. Tente novamente em instantes.",
            Self::OrderFlow(e) => match e {
                OrderFlowError::GigNotAvailable => "Este serviço não está disponível no momento.",
                OrderFlowError::SelfPurchase => "Você não pode comprar a sua própria tiragem.",
                OrderFlowError::DailyLimitReached => {
                    "O tarólogo atingiu o limite de pedidos de hoje. Tente novamente amanhã."
                },
                OrderFlowError::SimultaneousLimitReached => "O tarólogo está com a agenda cheia no momento.",
                OrderFlowError::IncompleteBuyerProfile(_) => {
                    "Complete seu CPF e celular no perfil antes de finalizar a compra."
                },
                OrderFlowError::UnknownAddon(_) => "Um dos adicionais selecionados não pertence a este serviço.",
                OrderFlowError::OrderNotFound(_) => "Pedido não encontrado.",
                OrderFlowError::PaymentNotFound(_) => "Pagamento não encontrado.",
                OrderFlowError::InvalidTransition { .. } => "O pedido não permite esta ação no estado atual.",
                OrderFlowError::NotYourOrder(_) => "Você não tem acesso a este pedido.",
                OrderFlowError::DatabaseError(_) => "Erro interno. Tente novamente em instantes.",
            },
            Self::Ledger(e) => match e {
                LedgerError::InvalidAmount => "O valor do saque deve ser positivo.",
                LedgerError::InsufficientBalance { .. } => "Saldo disponível insuficiente para este saque.",
                LedgerError::MissingPixKey => "Cadastre uma chave PIX antes de solicitar um saque.",
                LedgerError::DatabaseError(_) => "Erro interno. Tente novamente em instantes.",
            },
            _ => "Erro interno. Tente novamente em instantes.",
        };
        msg.to_string()
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No session token was provided.")]
    MissingToken,
    #[error("The session token is invalid or has expired.")]
    InvalidToken,
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::SessionNotFound => Self::AuthenticationError(AuthError::InvalidToken),
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        Self::OrderFlow(e)
    }
}

impl From<LedgerError> for ServerError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}
