use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::user_addresses::{Column as AddressCol, Entity as UserAddresses, Model as AddressModel},
    error::{AppError, AppResult},
};

/// Resolve the shipping address for (user, address). Generic over the
/// connection so it can run inside the caller's transaction.
pub async fn query_user_address<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    address_id: Uuid,
) -> AppResult<AddressModel> {
    UserAddresses::find_by_id(address_id)
        .filter(AddressCol::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(AppError::AddressNotFound)
}

/// Composed single-line address as it is snapshotted onto an order.
pub fn compose_address(address: &AddressModel) -> String {
    format!(
        "{} {} {} {}",
        address.province, address.city, address.district, address.detail
    )
}
