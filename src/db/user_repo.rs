// src/db/user_repo.rs

use crate::{
    common::error::AppError,
    db::store::Tables,
    models::auth::{User, UserId},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    // Busca exata, sem diferenciar maiúsculas de minúsculas
    pub fn find_by_email<'t>(&self, tx: &'t Tables, email: &str) -> Option<&'t User> {
        let email = email.to_lowercase();
        tx.users.iter().find(|u| u.email.to_lowercase() == email)
    }

    pub fn find_by_id<'t>(&self, tx: &'t Tables, id: UserId) -> Option<&'t User> {
        tx.users.iter().find(|u| u.id == id)
    }

    pub fn list(&self, tx: &Tables) -> Vec<User> {
        tx.users.clone()
    }

    /// Verifica se o e-mail já pertence a outro usuário.
    pub fn email_taken(&self, tx: &Tables, email: &str, except: Option<UserId>) -> bool {
        let email = email.trim().to_lowercase();
        tx.users
            .iter()
            .any(|u| Some(u.id) != except && u.email.to_lowercase() == email)
    }

    pub fn next_id(&self, tx: &Tables) -> UserId {
        tx.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }

    pub fn insert(&self, tx: &mut Tables, user: User) -> User {
        tx.users.push(user.clone());
        user
    }

    pub fn update(&self, tx: &mut Tables, user: User) -> Result<User, AppError> {
        let slot = tx
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AppError::UserNotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    pub fn delete(&self, tx: &mut Tables, id: UserId) -> Result<User, AppError> {
        let index = tx
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        Ok(tx.users.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_tables;

    #[test]
    fn email_lookup_ignores_case() {
        let tables = demo_tables();
        let repo = UserRepository::new();
        let user = repo.find_by_email(&tables, "ANA@Kitchen.com").unwrap();
        assert_eq!(user.id, 5);
        assert!(repo.find_by_email(&tables, "nobody@kitchen.com").is_none());
    }

    #[test]
    fn email_lookup_does_not_trim() {
        let tables = demo_tables();
        let repo = UserRepository::new();
        assert!(repo.find_by_email(&tables, " ana@kitchen.com ").is_none());
    }

    #[test]
    fn email_taken_excludes_the_user_itself() {
        let tables = demo_tables();
        let repo = UserRepository::new();
        assert!(repo.email_taken(&tables, "ana@kitchen.com", None));
        assert!(!repo.email_taken(&tables, "ana@kitchen.com", Some(5)));
        assert_eq!(repo.next_id(&tables), 11);
    }
}
