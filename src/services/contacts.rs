use std::sync::Arc;

use crate::{
    error::{AppResult, ContactError},
    models::{Contact, UserId},
    stores::{ContactStore, UserStore},
};

/// Maintains a user's contact list
#[derive(Clone)]
pub struct ContactService {
    users: Arc<dyn UserStore>,
    contacts: Arc<dyn ContactStore>,
}

impl ContactService {
    pub fn new(users: Arc<dyn UserStore>, contacts: Arc<dyn ContactStore>) -> Self {
        Self { users, contacts }
    }

    pub async fn list(&self, owner_id: &UserId) -> AppResult<Vec<Contact>> {
        self.contacts.get_contacts_for_user(owner_id).await
    }

    /// Adds the user whose id was typed as `raw_contact_id`
    ///
    /// Checked in order: id shape, self, duplicate, existence.
    pub async fn add_contact(&self, owner_id: &UserId, raw_contact_id: &str) -> AppResult<Contact> {
        let contact_id = UserId::parse(raw_contact_id).ok_or(ContactError::InvalidIdentifier)?;
        if &contact_id == owner_id {
            return Err(ContactError::SelfContactNotAllowed.into());
        }
        if self.contacts.get_contact(owner_id, &contact_id).await?.is_some() {
            return Err(ContactError::ContactAlreadyExists.into());
        }
        if !self.users.user_exists(&contact_id).await? {
            return Err(ContactError::UserNotFound.into());
        }

        let contact = Contact::new(owner_id.clone(), contact_id);
        self.contacts.add_contact(&contact).await?;

        tracing::info!(owner_id = %owner_id, contact_id = %contact.contact_id, "Contact added");
        Ok(contact)
    }

    /// Adds a peer that was just matched with
    ///
    /// The peer is known to exist, so only duplicates are rejected.
    pub async fn add_matched_peer(&self, owner_id: &UserId, peer_id: &UserId) -> AppResult<Contact> {
        if self.contacts.get_contact(owner_id, peer_id).await?.is_some() {
            tracing::debug!(owner_id = %owner_id, contact_id = %peer_id, "Matched peer already a contact");
            return Err(ContactError::ContactAlreadyExists.into());
        }

        let contact = Contact::new(owner_id.clone(), peer_id.clone());
        self.contacts.add_contact(&contact).await?;

        tracing::info!(owner_id = %owner_id, contact_id = %peer_id, "Matched peer added to contacts");
        Ok(contact)
    }

    /// Sets the name the owner sees for a contact
    ///
    /// The name is trimmed. A contact missing from the list is added with
    /// this name.
    pub async fn rename(&self, owner_id: &UserId, contact_id: &UserId, display_name: &str) -> AppResult<Contact> {
        let display_name = display_name.trim().to_string();

        let contact = match self.contacts.get_contact(owner_id, contact_id).await? {
            Some(existing) => {
                let updated = Contact {
                    display_name,
                    ..existing
                };
                self.contacts.update_contact(&updated).await?;
                updated
            }
            None => {
                let created = Contact {
                    display_name,
                    ..Contact::new(owner_id.clone(), contact_id.clone())
                };
                self.contacts.add_contact(&created).await?;
                created
            }
        };

        tracing::debug!(owner_id = %owner_id, contact_id = %contact_id, "Contact renamed");
        Ok(contact)
    }

    pub async fn delete(&self, owner_id: &UserId, contact_id: &UserId) -> AppResult<()> {
        if self.contacts.get_contact(owner_id, contact_id).await?.is_none() {
            return Err(ContactError::ContactNotFound.into());
        }
        self.contacts.delete_contact(owner_id, contact_id).await?;

        tracing::info!(owner_id = %owner_id, contact_id = %contact_id, "Contact deleted");
        Ok(())
    }
}
