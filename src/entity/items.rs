use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_name: String,
    pub main_img: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_specs::Entity")]
    ItemSpecs,
}

impl Related<super::item_specs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemSpecs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
