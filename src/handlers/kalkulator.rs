//! `kalkulator:*` channels. Pure computations, no database access.

use crate::{
    error::ServiceResult,
    models::calculator::{TruckPremium, TruckPremiumRequest, VehiclePremium, VehiclePremiumRequest},
    services::{truck_calculator, vehicle_calculator},
};

pub async fn kjoeretoey(req: VehiclePremiumRequest) -> ServiceResult<VehiclePremium> {
    let premium = vehicle_calculator::calculate_vehicle_premium(&req);
    tracing::debug!(klasse = ?req.kjoeretoeyklasse, total = %premium.total, "Vehicle premium");
    Ok(premium)
}

pub async fn lastebil(req: TruckPremiumRequest) -> ServiceResult<TruckPremium> {
    let premium = truck_calculator::calculate_truck_premium(&req);
    tracing::debug!(truck_type = ?req.kjoeretoeytype, total = %premium.total, "Truck premium");
    Ok(premium)
}
