mod donation_fixtures;
