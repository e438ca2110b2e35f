use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub spec_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item_specs::Entity",
        from = "Column::SpecId",
        to = "super::item_specs::Column::Id"
    )]
    ItemSpecs,
}

impl Related<super::item_specs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemSpecs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
