//! Localized error messages
//!
//! Message bundles for the three interface languages, keyed by the domain
//! error variant. The base language is uz.

use crate::domain::{Locale, ShopError};

/// Render the user-facing message for a domain error in the given locale.
pub fn render(err: &ShopError, locale: Locale) -> String {
    match err {
        ShopError::CategoryNotFound(_) => match locale {
            Locale::Uz => "Kategoriya topilmadi".to_string(),
            Locale::Ru => "Категория не найдена".to_string(),
            Locale::En => "Category not found".to_string(),
        },
        ShopError::ProductNotFound(_) => match locale {
            Locale::Uz => "Mahsulot topilmadi".to_string(),
            Locale::Ru => "Товар не найден".to_string(),
            Locale::En => "Product not found".to_string(),
        },
        ShopError::UserNotFound(_) => match locale {
            Locale::Uz => "Foydalanuvchi topilmadi".to_string(),
            Locale::Ru => "Пользователь не найден".to_string(),
            Locale::En => "User not found".to_string(),
        },
        ShopError::TransactionNotFound(_) => match locale {
            Locale::Uz => "Tranzaksiya topilmadi".to_string(),
            Locale::Ru => "Транзакция не найдена".to_string(),
            Locale::En => "Transaction not found".to_string(),
        },
        ShopError::InsufficientStock { product, .. } => match locale {
            Locale::Uz => format!("'{product}' mahsuloti omborda yetarli emas"),
            Locale::Ru => format!("Товара '{product}' недостаточно на складе"),
            Locale::En => format!("Not enough stock for product '{product}'"),
        },
        ShopError::InsufficientBalance { .. } => match locale {
            Locale::Uz => "Hisobingizda mablag' yetarli emas".to_string(),
            Locale::Ru => "Недостаточно средств на счёте".to_string(),
            Locale::En => "Insufficient balance".to_string(),
        },
        ShopError::InvalidAmount(_) => match locale {
            Locale::Uz => "Summa noto'g'ri kiritildi".to_string(),
            Locale::Ru => "Введена неверная сумма".to_string(),
            Locale::En => "Invalid amount".to_string(),
        },
        ShopError::UnauthorizedAccess => match locale {
            Locale::Uz => "Ruxsat berilmagan".to_string(),
            Locale::Ru => "Доступ запрещён".to_string(),
            Locale::En => "Access denied".to_string(),
        },
    }
}

/// Generic message for unexpected, non-domain failures. Internal detail is
/// never leaked to clients.
pub fn generic_failure(locale: Locale) -> &'static str {
    match locale {
        Locale::Uz => "Iltimos support bilan bog'laning",
        Locale::Ru => "Пожалуйста, свяжитесь с поддержкой",
        Locale::En => "Please contact support",
    }
}

/// Success message for a completed registration.
pub fn register_success(locale: Locale) -> &'static str {
    match locale {
        Locale::Uz => "Muvaffaqiyatli ro'yxatdan o'tdingiz!",
        Locale::Ru => "Вы успешно зарегистрировались!",
        Locale::En => "You have registered successfully!",
    }
}

/// Message for a registration attempt with a username that is already taken.
pub fn username_taken(locale: Locale) -> &'static str {
    match locale {
        Locale::Uz => "Bu username allaqachon band!",
        Locale::Ru => "Этот username уже занят!",
        Locale::En => "This username is already taken!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_all_locales() {
        let errors = [
            ShopError::CategoryNotFound(1),
            ShopError::ProductNotFound(1),
            ShopError::UserNotFound(1),
            ShopError::TransactionNotFound(1),
            ShopError::InsufficientStock {
                product: "Suv".into(),
                requested: 2,
                available: 1,
            },
            ShopError::insufficient_balance(2.into(), 1.into()),
            ShopError::invalid_amount("zero"),
            ShopError::UnauthorizedAccess,
        ];

        for err in &errors {
            for locale in [Locale::Uz, Locale::Ru, Locale::En] {
                assert!(!render(err, locale).is_empty());
            }
        }
    }

    #[test]
    fn test_stock_message_includes_product_name() {
        let err = ShopError::InsufficientStock {
            product: "Suv".into(),
            requested: 20,
            available: 7,
        };
        assert!(render(&err, Locale::En).contains("Suv"));
        assert!(render(&err, Locale::Uz).contains("Suv"));
    }
}
