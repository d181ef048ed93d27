// Column names keep the camelCase spelling of databases written by earlier
// releases so those files open unchanged.

diesel::table! {
    proposals (id) {
        id -> BigInt,
        #[sql_name = "companyName"]
        company_name -> Text,
        #[sql_name = "personName"]
        person_name -> Text,
        #[sql_name = "planName"]
        plan_name -> Text,
        date -> Text,
        amount -> Text,
        #[sql_name = "usersCount"]
        users_count -> Nullable<BigInt>,
        #[sql_name = "annualPricePerUser"]
        annual_price_per_user -> Nullable<Text>,
        #[sql_name = "annualDiscountPercent"]
        annual_discount_percent -> Nullable<Text>,
        #[sql_name = "discountedAnnualPricing"]
        discounted_annual_pricing -> Nullable<Text>,
        #[sql_name = "createdAt"]
        created_at -> Timestamp,
    }
}
